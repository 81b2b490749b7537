//! Conversation history storage.
//!
//! Messages are kept as a JSON array in the `messages` column, so appending a message
//! is a read-modify-write inside one transaction.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{Conversation, ConversationPatch, NewConversation, StoredMessage};
use super::{decode_json_list, UpdateSet};

const MUTABLE_COLUMNS: &[&str] = &["title", "smart_tags", "is_active", "last_updated", "messages"];

const SELECT_COLUMNS: &str = "id, title, smart_tags, is_active, last_updated, messages";

/// Raw column tuple before the JSON columns are decoded.
type ConversationRow = (i64, String, Option<String>, Option<i64>, Option<String>, Option<String>);

fn row_to_conversation(row: &Row<'_>) -> rusqlite::Result<ConversationRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn hydrate((id, title, tags, is_active, last_updated, messages): ConversationRow) -> Result<Conversation> {
    Ok(Conversation {
        id,
        title,
        smart_tags: decode_json_list(tags)?,
        is_active: is_active.unwrap_or(0),
        last_updated: last_updated.unwrap_or_default(),
        messages: decode_json_list(messages)?,
    })
}

/// All conversations, newest first.
pub fn list_conversations(conn: &Connection) -> Result<Vec<Conversation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM conversations ORDER BY id DESC"
    ))?;
    let rows = stmt
        .query_map([], row_to_conversation)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(hydrate).collect()
}

pub fn get_conversation(conn: &Connection, id: i64) -> Result<Option<Conversation>> {
    let row = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM conversations WHERE id = ?1"),
            params![id],
            row_to_conversation,
        )
        .optional()?;
    row.map(hydrate).transpose()
}

/// Insert a conversation and return its id.
pub fn create_conversation(conn: &Connection, new: &NewConversation) -> Result<i64> {
    conn.execute(
        "INSERT INTO conversations (title, smart_tags, is_active, last_updated, messages) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.title,
            serde_json::to_string(&new.smart_tags)?,
            new.is_active,
            new.last_updated,
            serde_json::to_string(&new.messages)?,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Apply a partial update. Returns `false` when the conversation does not exist or
/// the patch carried no fields.
pub fn update_conversation(conn: &Connection, id: i64, patch: &ConversationPatch) -> Result<bool> {
    let mut set = UpdateSet::new(MUTABLE_COLUMNS);
    set.set_opt("title", patch.title.clone())?;
    set.set_opt(
        "smart_tags",
        patch.smart_tags.as_ref().map(serde_json::to_string).transpose()?,
    )?;
    set.set_opt("is_active", patch.is_active)?;
    set.set_opt("last_updated", patch.last_updated.clone())?;
    set.set_opt(
        "messages",
        patch.messages.as_ref().map(serde_json::to_string).transpose()?,
    )?;

    if set.is_empty() {
        return Ok(false);
    }
    Ok(set.execute(conn, "conversations", "id", id)? > 0)
}

/// Delete a conversation. Returns `false` if it did not exist.
pub fn delete_conversation(conn: &Connection, id: i64) -> Result<bool> {
    let rows = conn.execute("DELETE FROM conversations WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

/// Append one message to a conversation. Returns `false` if the conversation is missing.
pub fn append_message(conn: &mut Connection, id: i64, message: &StoredMessage) -> Result<bool> {
    let tx = conn.transaction()?;

    let raw: Option<Option<String>> = tx
        .query_row(
            "SELECT messages FROM conversations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(raw) = raw else {
        return Ok(false);
    };

    let mut messages: Vec<StoredMessage> = decode_json_list(raw)?;
    messages.push(message.clone());

    tx.execute(
        "UPDATE conversations SET messages = ?1 WHERE id = ?2",
        params![serde_json::to_string(&messages)?, id],
    )?;
    tx.commit()?;
    Ok(true)
}

/// The last `limit` messages of a conversation in chronological order, or `None` if
/// the conversation does not exist.
pub fn recent_messages(conn: &Connection, id: i64, limit: usize) -> Result<Option<Vec<StoredMessage>>> {
    let raw: Option<Option<String>> = conn
        .query_row(
            "SELECT messages FROM conversations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(raw) = raw else {
        return Ok(None);
    };
    let mut messages: Vec<StoredMessage> = decode_json_list(raw)?;
    let skip = messages.len().saturating_sub(limit);
    Ok(Some(messages.split_off(skip)))
}
