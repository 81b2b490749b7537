use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::extract::ApiJson;
use super::AppState;
use crate::error::GatewayResult;
use crate::novels::{self, GeneratedNovel, NovelFolders, NovelGenerateRequest, NovelSaveRequest, SavedNovel};

pub(crate) async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NovelGenerateRequest>,
) -> GatewayResult<Json<GeneratedNovel>> {
    let orchestrator = &state.orchestrator;
    let novel = novels::generate(
        orchestrator.inference().as_ref(),
        &body,
        orchestrator.default_model(),
    )
    .await?;
    Ok(Json(novel))
}

pub(crate) async fn save(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NovelSaveRequest>,
) -> GatewayResult<Json<SavedNovel>> {
    let dir = state.novel_dir.clone();
    let saved = tokio::task::spawn_blocking(move || novels::save(&dir, &body)).await??;
    Ok(Json(saved))
}

pub(crate) async fn folders(State(state): State<Arc<AppState>>) -> GatewayResult<Json<NovelFolders>> {
    let dir = state.novel_dir.clone();
    let folders = tokio::task::spawn_blocking(move || novels::list_folders(&dir)).await??;
    Ok(Json(folders))
}
