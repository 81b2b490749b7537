//! Record types for the relational store.
//!
//! Field names follow the JSON the browser frontend already speaks
//! (`smartTags`, `isActive`, `type`), so these types double as request and
//! response bodies for the REST layer.

use serde::{Deserialize, Serialize};

/// Like/dislike counters attached to a chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
}

/// One message inside a stored conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(default)]
    pub id: i64,
    /// `sent` for user-authored messages; anything else came from the assistant.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Reactions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_action: Option<serde_json::Value>,
}

impl StoredMessage {
    pub fn is_user_sent(&self) -> bool {
        self.kind == "sent"
    }
}

/// A conversation row with its decoded JSON columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    #[serde(rename = "smartTags")]
    pub smart_tags: Vec<String>,
    pub is_active: i64,
    pub last_updated: String,
    pub messages: Vec<StoredMessage>,
}

/// Body for creating a conversation. Every container starts empty per call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewConversation {
    pub title: String,
    #[serde(default, rename = "smartTags")]
    pub smart_tags: Vec<String>,
    #[serde(default)]
    pub is_active: i64,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

/// Partial update for a conversation; only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationPatch {
    pub title: Option<String>,
    #[serde(rename = "smartTags")]
    pub smart_tags: Option<Vec<String>>,
    pub is_active: Option<i64>,
    pub last_updated: Option<String>,
    pub messages: Option<Vec<StoredMessage>>,
}

impl ConversationPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.smart_tags.is_none()
            && self.is_active.is_none()
            && self.last_updated.is_none()
            && self.messages.is_none()
    }
}

/// A memory bank entry: metadata about an uploaded knowledge file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub source: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMemoryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub source: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryItemPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
}

impl MemoryItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.size.is_none()
            && self.source.is_none()
            && self.status.is_none()
    }
}

/// A roleplay character record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPersona {
    pub character_id: String,
    pub name: String,
    pub user_relationship: String,
    pub character_role: String,
    pub user_persona_nickname: Option<String>,
    pub greeting: Option<String>,
    pub short_description: Option<String>,
    pub voice_id: Option<String>,
    pub visibility: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    /// Long-form roleplay sheet, generated by the model at creation time.
    pub definition: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// Body for creating a character. `definition` is produced server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCharacterPersona {
    pub name: String,
    pub user_relationship: String,
    pub character_role: String,
    #[serde(default)]
    pub user_persona_nickname: Option<String>,
    #[serde(default)]
    pub greeting: Option<String>,
    pub short_description: String,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPersonaPatch {
    pub name: Option<String>,
    pub user_relationship: Option<String>,
    pub character_role: Option<String>,
    pub user_persona_nickname: Option<String>,
    pub greeting: Option<String>,
    pub short_description: Option<String>,
    pub voice_id: Option<String>,
    pub visibility: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub definition: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

impl CharacterPersonaPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.user_relationship.is_none()
            && self.character_role.is_none()
            && self.user_persona_nickname.is_none()
            && self.greeting.is_none()
            && self.short_description.is_none()
            && self.voice_id.is_none()
            && self.visibility.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.definition.is_none()
            && self.is_active.is_none()
    }
}

/// One line of a character chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub timestamp: String,
}

/// The stored transcript for one character. `exists` is false when nothing was saved yet.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterTranscript {
    pub character_id: String,
    pub messages: Vec<TranscriptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub exists: bool,
}
