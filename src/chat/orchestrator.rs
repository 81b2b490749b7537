//! One chat request end to end: classify, maybe run a tool, compose, infer.

use std::sync::Arc;

use super::history::HistorySource;
use super::inference::InferenceClient;
use super::intent::{self, Intent};
use super::prompt;
use super::types::{ChatReply, ConversationTurn, PersonaDescriptor, ToolAction, ToolKind};
use crate::error::GatewayResult;
use crate::tools::ToolInvoker;

/// Returned instead of a model reply when the clock tool itself fails.
pub const DATETIME_FAILURE_NOTICE: &str = "Gagal mengambil waktu server.";

/// Input for [`ChatOrchestrator::handle`].
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub prompt: String,
    /// Falls back to the configured default model.
    pub model: Option<String>,
    pub conversation_id: Option<i64>,
    pub persona: Option<PersonaDescriptor>,
}

#[derive(Clone)]
pub struct ChatOrchestrator {
    inference: Arc<dyn InferenceClient>,
    tools: Arc<dyn ToolInvoker>,
    history: Arc<dyn HistorySource>,
    default_model: String,
    history_limit: usize,
}

impl ChatOrchestrator {
    pub fn new(
        inference: Arc<dyn InferenceClient>,
        tools: Arc<dyn ToolInvoker>,
        history: Arc<dyn HistorySource>,
        default_model: impl Into<String>,
        history_limit: usize,
    ) -> Self {
        Self {
            inference,
            tools,
            history,
            default_model: default_model.into(),
            history_limit,
        }
    }

    pub fn inference(&self) -> &Arc<dyn InferenceClient> {
        &self.inference
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub async fn handle(&self, request: ChatRequest) -> GatewayResult<ChatReply> {
        let model = request
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.default_model);
        let intent = intent::classify(&request.prompt);
        tracing::debug!(
            ?intent,
            model,
            conversation_id = ?request.conversation_id,
            persona = request.persona.is_some(),
            "chat request"
        );

        let history = match request.conversation_id {
            Some(id) => self
                .history
                .recent_turns(id, self.history_limit)
                .await?
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let (prompt_text, tool_action) = match intent {
            Some(Intent::GetDatetime) => match self.tools.current_time().await {
                Ok(report) => (
                    format!("{}\n\nInfo waktu server: {}", request.prompt, report.message),
                    Some(ToolAction::new(ToolKind::GetDatetime, None, report.message, false)),
                ),
                Err(e) => {
                    tracing::warn!(error = %e, "datetime tool failed");
                    return Ok(ChatReply {
                        reply_text: DATETIME_FAILURE_NOTICE.to_string(),
                        tool_action: Some(ToolAction::new(
                            ToolKind::GetDatetime,
                            None,
                            DATETIME_FAILURE_NOTICE,
                            false,
                        )),
                    });
                }
            },
            Some(Intent::OpenApp { app }) => {
                let (status, requires_confirmation) = match self.tools.open_app(&app, false).await {
                    Ok(outcome) => (outcome.message().to_string(), outcome.requires_confirmation()),
                    Err(e) => (e.to_string(), false),
                };
                (
                    format!("{}\n\nStatus aplikasi: {}", request.prompt, status),
                    Some(ToolAction::new(
                        ToolKind::OpenApp,
                        Some(app),
                        status,
                        requires_confirmation,
                    )),
                )
            }
            None => (request.prompt, None),
        };

        let reply_text = self
            .infer(
                request.persona.as_ref(),
                &prompt_text,
                &history,
                model,
            )
            .await?;

        Ok(ChatReply {
            reply_text,
            tool_action,
        })
    }

    async fn infer(
        &self,
        persona: Option<&PersonaDescriptor>,
        prompt_text: &str,
        history: &[ConversationTurn],
        model: &str,
    ) -> GatewayResult<String> {
        let history = (!history.is_empty()).then_some(history);
        let messages = prompt::compose(persona, prompt_text, history);
        self.inference.complete(&messages, model).await
    }
}
