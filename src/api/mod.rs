//! HTTP surface for the browser frontend.
//!
//! Every handler returns `GatewayResult<Json<..>>`; failures render as
//! `{"detail": ...}` through [`crate::error::GatewayError`]'s `IntoResponse`.

mod characters;
mod chat;
mod conversations;
mod extract;
mod health;
mod memory;
mod novels;
mod tools;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::chat::ChatOrchestrator;
use crate::db::Db;
use crate::tools::ToolInvoker;

/// Shared state handed to every handler.
pub struct AppState {
    pub db: Db,
    pub orchestrator: ChatOrchestrator,
    pub tools: Arc<dyn ToolInvoker>,
    pub novel_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub(crate) struct Success {
    success: bool,
}

impl Success {
    pub(crate) const fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Created {
    id: i64,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route(
            "/conversations",
            get(conversations::list).post(conversations::create),
        )
        .route(
            "/conversations/{id}",
            get(conversations::get_one)
                .put(conversations::update)
                .delete(conversations::delete),
        )
        .route("/conversations/{id}/message", post(conversations::append_message))
        .route("/memory", get(memory::list).post(memory::create))
        .route(
            "/memory/{id}",
            get(memory::get_one).put(memory::update).delete(memory::delete),
        )
        .route("/character_personas", get(characters::list))
        .route("/character", post(characters::create))
        .route(
            "/character/{id}",
            get(characters::get_one)
                .put(characters::update)
                .delete(characters::delete),
        )
        .route("/character/{id}/activate", put(characters::activate))
        .route(
            "/character/{id}/conversation",
            get(characters::get_transcript)
                .post(characters::save_transcript)
                .delete(characters::delete_transcript),
        )
        .route("/api/tools/datetime", get(tools::datetime))
        .route("/api/tools/open_app", post(tools::open_app))
        .route("/tools/novel/generate", post(novels::generate))
        .route("/tools/novel/save", post(novels::save))
        .route("/tools/novel/folders", get(novels::folders))
        .layer(cors)
        .with_state(state)
}
