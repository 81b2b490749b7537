//! CLI `chat` command: one orchestrated turn against the configured model server.

use anyhow::{Context, Result};

use crate::chat::{ChatRequest, PersonaDescriptor};
use crate::config::OrionConfig;
use crate::server;
use crate::store::personas;

pub async fn chat(
    config: &OrionConfig,
    prompt: String,
    model: Option<String>,
    conversation: Option<i64>,
    character: Option<String>,
) -> Result<()> {
    let state = server::build_state(config)?;

    let persona = match character {
        Some(id) => {
            let lookup = id.clone();
            let record = state
                .db
                .call(move |conn| personas::get_persona(conn, &lookup))
                .await?
                .with_context(|| format!("character not found: {id}"))?;
            Some(PersonaDescriptor::from(&record))
        }
        None => None,
    };

    let reply = state
        .orchestrator
        .handle(ChatRequest {
            prompt,
            model,
            conversation_id: conversation,
            persona,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
