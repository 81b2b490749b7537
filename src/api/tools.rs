use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::extract::ApiJson;
use super::AppState;
use crate::error::GatewayResult;
use crate::tools::datetime::DatetimeReport;
use crate::tools::open_app::OpenAppOutcome;

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAppBody {
    app_name: String,
    #[serde(default)]
    confirm: bool,
}

pub(crate) async fn datetime(State(state): State<Arc<AppState>>) -> GatewayResult<Json<DatetimeReport>> {
    Ok(Json(state.tools.current_time().await?))
}

/// The only path that can actually start a process: the UI sends `confirm: true`
/// after the user accepted the proposal from `/chat`.
pub(crate) async fn open_app(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<OpenAppBody>,
) -> GatewayResult<Json<OpenAppOutcome>> {
    Ok(Json(state.tools.open_app(&body.app_name, body.confirm).await?))
}
