use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::extract::{ApiJson, ApiPath};
use super::{AppState, Created, Success};
use crate::error::{GatewayError, GatewayResult};
use crate::store::memory_bank as store;
use crate::store::types::{MemoryItem, MemoryItemPatch, NewMemoryItem};

fn not_found(id: i64) -> GatewayError {
    GatewayError::NotFound(format!("Memory item not found: {id}"))
}

pub(crate) async fn list(State(state): State<Arc<AppState>>) -> GatewayResult<Json<Vec<MemoryItem>>> {
    Ok(Json(state.db.call(|conn| store::list_items(conn)).await?))
}

pub(crate) async fn get_one(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> GatewayResult<Json<MemoryItem>> {
    state
        .db
        .call(move |conn| store::get_item(conn, id))
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewMemoryItem>,
) -> GatewayResult<Json<Created>> {
    let id = state.db.call(move |conn| store::create_item(conn, &body)).await?;
    Ok(Json(Created { id }))
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<MemoryItemPatch>,
) -> GatewayResult<Json<Success>> {
    if patch.is_empty() {
        return Err(GatewayError::BadRequest("No fields to update".into()));
    }
    let updated = state
        .db
        .call(move |conn| store::update_item(conn, id, &patch))
        .await?;
    if !updated {
        return Err(not_found(id));
    }
    Ok(Json(Success::ok()))
}

pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> GatewayResult<Json<Success>> {
    if !state.db.call(move |conn| store::delete_item(conn, id)).await? {
        return Err(not_found(id));
    }
    Ok(Json(Success::ok()))
}
