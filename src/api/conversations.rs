use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::extract::{ApiJson, ApiPath};
use super::{AppState, Created, Success};
use crate::error::{GatewayError, GatewayResult};
use crate::store::conversations as store;
use crate::store::types::{Conversation, ConversationPatch, NewConversation, StoredMessage};

fn not_found(id: i64) -> GatewayError {
    GatewayError::NotFound(format!("Conversation not found: {id}"))
}

pub(crate) async fn list(State(state): State<Arc<AppState>>) -> GatewayResult<Json<Vec<Conversation>>> {
    let all = state.db.call(|conn| store::list_conversations(conn)).await?;
    Ok(Json(all))
}

pub(crate) async fn get_one(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> GatewayResult<Json<Conversation>> {
    state
        .db
        .call(move |conn| store::get_conversation(conn, id))
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewConversation>,
) -> GatewayResult<Json<Created>> {
    let id = state
        .db
        .call(move |conn| store::create_conversation(conn, &body))
        .await?;
    tracing::info!(id, "conversation created");
    Ok(Json(Created { id }))
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<ConversationPatch>,
) -> GatewayResult<Json<Success>> {
    if patch.is_empty() {
        return Err(GatewayError::BadRequest("No fields to update".into()));
    }
    let updated = state
        .db
        .call(move |conn| store::update_conversation(conn, id, &patch))
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
    let deleted = state
        .db
        .call(move |conn| store::delete_conversation(conn, id))
        .await?;
    if !deleted {
        return Err(not_found(id));
    }
    tracing::info!(id, "conversation deleted");
    Ok(Json(Success::ok()))
}

pub(crate) async fn append_message(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(message): ApiJson<StoredMessage>,
) -> GatewayResult<Json<Success>> {
    let appended = state
        .db
        .call(move |conn| store::append_message(conn, id, &message))
        .await?;
    if !appended {
        return Err(not_found(id));
    }
    Ok(Json(Success::ok()))
}
