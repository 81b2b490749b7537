//! Value types that flow through the chat pipeline.

use serde::{Deserialize, Serialize};

use crate::store::types::{CharacterPersona, StoredMessage};

/// Speaker of a [`Message`] sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array in an inference request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A prior turn replayed to the model. Only ever `User` or `Assistant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl From<&StoredMessage> for ConversationTurn {
    fn from(msg: &StoredMessage) -> Self {
        let role = if msg.is_user_sent() {
            Role::User
        } else {
            Role::Assistant
        };
        Self {
            role,
            text: msg.content.clone(),
        }
    }
}

/// The identity the model role-plays as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaDescriptor {
    pub display_name: String,
    pub description: String,
    /// How the persona addresses the user.
    pub user_address_form: String,
    pub speech_style: String,
    pub greeting: String,
}

impl From<&CharacterPersona> for PersonaDescriptor {
    fn from(p: &CharacterPersona) -> Self {
        let description = p
            .definition
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(p.short_description.as_deref())
            .unwrap_or_default();
        let address = p
            .user_persona_nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("User");
        Self {
            display_name: p.name.clone(),
            description: description.to_string(),
            user_address_form: address.to_string(),
            speech_style: String::new(),
            greeting: p.greeting.clone().unwrap_or_default(),
        }
    }
}

/// Which local tool handled (part of) a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    GetDatetime,
    OpenApp,
}

/// Record of a tool invocation, returned to the UI next to the reply.
///
/// Serialized as `{"type":"tool_action","tool":..,"app_name":..,"message":..,"result":..,"action_required":..}`.
/// `result` repeats `message` for frontends that read the older field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAction {
    pub kind: ToolKind,
    pub matched_argument: Option<String>,
    pub result_text: String,
    pub requires_confirmation: bool,
}

impl Serialize for ToolAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ToolAction", 6)?;
        state.serialize_field("type", "tool_action")?;
        state.serialize_field("tool", &self.kind)?;
        match &self.matched_argument {
            Some(app) => state.serialize_field("app_name", app)?,
            None => state.skip_field("app_name")?,
        }
        state.serialize_field("message", &self.result_text)?;
        state.serialize_field("result", &self.result_text)?;
        state.serialize_field("action_required", &self.requires_confirmation)?;
        state.end()
    }
}

impl ToolAction {
    pub fn new(
        kind: ToolKind,
        matched_argument: Option<String>,
        result_text: impl Into<String>,
        requires_confirmation: bool,
    ) -> Self {
        Self {
            kind,
            matched_argument,
            result_text: result_text.into(),
            requires_confirmation,
        }
    }
}

/// What the orchestrator hands back for one chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub reply_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_action: Option<ToolAction>,
}
