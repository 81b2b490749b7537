use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::extract::{ApiJson, ApiPath};
use super::{AppState, Success};
use crate::error::{GatewayError, GatewayResult};
use crate::roleplay;
use crate::store::personas as store;
use crate::store::types::{
    CharacterPersona, CharacterPersonaPatch, CharacterTranscript, NewCharacterPersona,
    TranscriptMessage,
};

fn not_found(id: &str) -> GatewayError {
    GatewayError::NotFound(format!("Character persona not found: {id}"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptBody {
    messages: Vec<TranscriptMessage>,
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
) -> GatewayResult<Json<Vec<CharacterPersona>>> {
    Ok(Json(state.db.call(|conn| store::list_personas(conn)).await?))
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewCharacterPersona>,
) -> GatewayResult<Json<CharacterPersona>> {
    let orchestrator = &state.orchestrator;
    let persona = roleplay::create_character(
        &state.db,
        orchestrator.inference().as_ref(),
        orchestrator.default_model(),
        body,
    )
    .await?;
    tracing::info!(character_id = %persona.character_id, name = %persona.name, "character created");
    Ok(Json(persona))
}

pub(crate) async fn get_one(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> GatewayResult<Json<CharacterPersona>> {
    let lookup = id.clone();
    state
        .db
        .call(move |conn| store::get_persona(conn, &lookup))
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<CharacterPersonaPatch>,
) -> GatewayResult<Json<Success>> {
    if patch.is_empty() {
        return Err(GatewayError::BadRequest("No fields to update".into()));
    }
    let lookup = id.clone();
    let updated = state
        .db
        .call(move |conn| store::update_persona(conn, &lookup, &patch))
        .await?;
    if !updated {
        return Err(not_found(&id));
    }
    Ok(Json(Success::ok()))
}

pub(crate) async fn activate(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> GatewayResult<Json<Success>> {
    let lookup = id.clone();
    if !state
        .db
        .call(move |conn| store::activate_persona(conn, &lookup))
        .await?
    {
        return Err(not_found(&id));
    }
    tracing::info!(character_id = %id, "character activated");
    Ok(Json(Success::ok()))
}

pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> GatewayResult<Json<Success>> {
    let lookup = id.clone();
    if !state
        .db
        .call(move |conn| store::delete_persona(conn, &lookup))
        .await?
    {
        return Err(not_found(&id));
    }
    Ok(Json(Success::ok()))
}

pub(crate) async fn get_transcript(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> GatewayResult<Json<CharacterTranscript>> {
    Ok(Json(
        state
            .db
            .call(move |conn| store::get_transcript(conn, &id))
            .await?,
    ))
}

pub(crate) async fn save_transcript(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<TranscriptBody>,
) -> GatewayResult<Json<Success>> {
    state
        .db
        .call(move |conn| store::save_transcript(conn, &id, &body.messages))
        .await?;
    Ok(Json(Success::ok()))
}

pub(crate) async fn delete_transcript(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> GatewayResult<Json<Success>> {
    state
        .db
        .call(move |conn| store::delete_transcript(conn, &id))
        .await?;
    Ok(Json(Success::ok()))
}
