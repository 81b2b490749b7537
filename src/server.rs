//! Service bootstrap: open the database, wire the chat core and bind the HTTP router.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{self, AppState};
use crate::chat::{ChatOrchestrator, OllamaClient};
use crate::config::OrionConfig;
use crate::db::{self, Db};
use crate::tools::SystemTools;

/// Open the database and build the handler state from `config`.
pub fn build_state(config: &OrionConfig) -> Result<Arc<AppState>> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");
    Ok(Arc::new(state_with_db(config, Db::new(conn))))
}

/// Wire the production tool, inference and history implementations around `db`.
pub fn state_with_db(config: &OrionConfig, db: Db) -> AppState {
    let tools = Arc::new(SystemTools::new());
    let inference = Arc::new(OllamaClient::new(&config.inference));
    let orchestrator = ChatOrchestrator::new(
        inference,
        tools.clone(),
        Arc::new(db.clone()),
        config.inference.default_model.clone(),
        config.chat.history_limit,
    );
    tracing::info!(
        model_server = %config.inference.base_url,
        default_model = %config.inference.default_model,
        "chat core ready"
    );

    AppState {
        db,
        orchestrator,
        tools,
        novel_dir: config.resolved_novel_dir(),
    }
}

/// Serve the HTTP API until Ctrl-C.
pub async fn serve(config: OrionConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = build_state(&config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "OrionAI gateway listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down gateway");
        })
        .await?;

    Ok(())
}
