use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::extract::{ApiJson, ApiQuery};
use super::AppState;
use crate::chat::{ChatReply, ChatRequest, PersonaDescriptor};
use crate::error::{GatewayError, GatewayResult};
use crate::store::personas;

#[derive(Debug, Deserialize)]
pub(crate) struct ChatBody {
    prompt: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default, alias = "conversationId")]
    conversation_id: Option<i64>,
    #[serde(default, alias = "characterId")]
    character_id: Option<String>,
}

/// Older frontends pass the conversation as `?conv_id=`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatQuery {
    conv_id: Option<i64>,
}

pub(crate) async fn chat(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ChatQuery>,
    ApiJson(body): ApiJson<ChatBody>,
) -> GatewayResult<Json<ChatReply>> {
    let persona = match body.character_id {
        Some(character_id) => {
            let lookup_id = character_id.clone();
            let record = state
                .db
                .call(move |conn| personas::get_persona(conn, &lookup_id))
                .await?
                .ok_or_else(|| {
                    GatewayError::NotFound(format!("Character persona not found: {character_id}"))
                })?;
            Some(PersonaDescriptor::from(&record))
        }
        None => None,
    };

    let reply = state
        .orchestrator
        .handle(ChatRequest {
            prompt: body.prompt,
            model: body.model,
            conversation_id: body.conversation_id.or(query.conv_id),
            persona,
        })
        .await?;
    Ok(Json(reply))
}
