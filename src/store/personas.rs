//! Roleplay character records and their saved chat transcripts.
//!
//! At most one persona is active at a time; [`activate_persona`] clears the flag on
//! every other row in the same transaction.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{
    CharacterPersona, CharacterPersonaPatch, CharacterTranscript, NewCharacterPersona,
    TranscriptMessage,
};
use super::{decode_json_list, UpdateSet};

const MUTABLE_COLUMNS: &[&str] = &[
    "name",
    "user_relationship",
    "character_role",
    "user_persona_nickname",
    "greeting",
    "short_description",
    "voice_id",
    "visibility",
    "category",
    "tags",
    "definition",
    "is_active",
];

const SELECT_COLUMNS: &str = "character_id, name, user_relationship, character_role, \
     user_persona_nickname, greeting, short_description, voice_id, visibility, category, \
     tags, definition, is_active";

/// Row shape before `tags` is decoded; JSON decoding can't fail inside a row mapper.
struct PersonaRow {
    persona: CharacterPersona,
    raw_tags: Option<String>,
}

fn row_to_persona(row: &Row<'_>) -> rusqlite::Result<PersonaRow> {
    Ok(PersonaRow {
        persona: CharacterPersona {
            character_id: row.get(0)?,
            name: row.get(1)?,
            user_relationship: row.get(2)?,
            character_role: row.get(3)?,
            user_persona_nickname: row.get(4)?,
            greeting: row.get(5)?,
            short_description: row.get(6)?,
            voice_id: row.get(7)?,
            visibility: row.get(8)?,
            category: row.get(9)?,
            tags: Vec::new(),
            definition: row.get(11)?,
            is_active: row.get::<_, Option<i64>>(12)?.unwrap_or(0) != 0,
        },
        raw_tags: row.get(10)?,
    })
}

fn hydrate(row: PersonaRow) -> Result<CharacterPersona> {
    let mut persona = row.persona;
    persona.tags = decode_json_list(row.raw_tags)?;
    Ok(persona)
}

/// Insert a new persona with a server-generated id and definition.
pub fn create_persona(
    conn: &Connection,
    new: &NewCharacterPersona,
    definition: &str,
) -> Result<CharacterPersona> {
    let character_id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO character_personas \
         (character_id, name, user_relationship, character_role, user_persona_nickname, \
          greeting, short_description, voice_id, visibility, category, tags, definition) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            character_id,
            new.name,
            new.user_relationship,
            new.character_role,
            new.user_persona_nickname,
            new.greeting.as_deref().unwrap_or(""),
            new.short_description,
            new.voice_id,
            new.visibility.as_deref().unwrap_or("private"),
            new.category.as_deref().unwrap_or("general"),
            serde_json::to_string(&new.tags)?,
            definition,
        ],
    )?;

    get_persona(conn, &character_id)?
        .ok_or_else(|| anyhow::anyhow!("persona vanished after insert: {character_id}"))
}

/// All personas, alphabetical by name.
pub fn list_personas(conn: &Connection) -> Result<Vec<CharacterPersona>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM character_personas ORDER BY name ASC"
    ))?;
    let rows = stmt
        .query_map([], row_to_persona)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(hydrate).collect()
}

pub fn get_persona(conn: &Connection, character_id: &str) -> Result<Option<CharacterPersona>> {
    let row = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM character_personas WHERE character_id = ?1"),
            params![character_id],
            row_to_persona,
        )
        .optional()?;
    row.map(hydrate).transpose()
}

/// Apply a partial update. Returns `false` if the persona is missing or the patch is empty.
pub fn update_persona(
    conn: &Connection,
    character_id: &str,
    patch: &CharacterPersonaPatch,
) -> Result<bool> {
    let mut set = UpdateSet::new(MUTABLE_COLUMNS);
    set.set_opt("name", patch.name.clone())?;
    set.set_opt("user_relationship", patch.user_relationship.clone())?;
    set.set_opt("character_role", patch.character_role.clone())?;
    set.set_opt("user_persona_nickname", patch.user_persona_nickname.clone())?;
    set.set_opt("greeting", patch.greeting.clone())?;
    set.set_opt("short_description", patch.short_description.clone())?;
    set.set_opt("voice_id", patch.voice_id.clone())?;
    set.set_opt("visibility", patch.visibility.clone())?;
    set.set_opt("category", patch.category.clone())?;
    set.set_opt("tags", patch.tags.as_ref().map(serde_json::to_string).transpose()?)?;
    set.set_opt("definition", patch.definition.clone())?;
    set.set_opt("is_active", patch.is_active.map(i64::from))?;

    if set.is_empty() {
        return Ok(false);
    }
    Ok(set.execute(conn, "character_personas", "character_id", character_id.to_string())? > 0)
}

/// Make `character_id` the only active persona. Returns `false` if it does not exist,
/// in which case nothing changes.
pub fn activate_persona(conn: &mut Connection, character_id: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM character_personas WHERE character_id = ?1",
        params![character_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(false);
    }
    tx.execute("UPDATE character_personas SET is_active = 0", [])?;
    tx.execute(
        "UPDATE character_personas SET is_active = 1 WHERE character_id = ?1",
        params![character_id],
    )?;
    tx.commit()?;
    Ok(true)
}

/// The currently active persona, if any.
pub fn active_persona(conn: &Connection) -> Result<Option<CharacterPersona>> {
    let row = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM character_personas WHERE is_active = 1 LIMIT 1"),
            [],
            row_to_persona,
        )
        .optional()?;
    row.map(hydrate).transpose()
}

/// Delete a persona and its transcript.
pub fn delete_persona(conn: &mut Connection, character_id: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM character_conversations WHERE character_id = ?1",
        params![character_id],
    )?;
    let rows = tx.execute(
        "DELETE FROM character_personas WHERE character_id = ?1",
        params![character_id],
    )?;
    tx.commit()?;
    Ok(rows > 0)
}

pub fn get_transcript(conn: &Connection, character_id: &str) -> Result<CharacterTranscript> {
    let row: Option<(Option<String>, Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT messages, created_at, updated_at FROM character_conversations WHERE character_id = ?1",
            params![character_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    Ok(match row {
        None => CharacterTranscript {
            character_id: character_id.to_string(),
            messages: Vec::new(),
            created_at: None,
            updated_at: None,
            exists: false,
        },
        Some((messages, created_at, updated_at)) => CharacterTranscript {
            character_id: character_id.to_string(),
            messages: decode_json_list(messages)?,
            created_at,
            updated_at,
            exists: true,
        },
    })
}

/// Replace the stored transcript, creating it on first save.
pub fn save_transcript(
    conn: &Connection,
    character_id: &str,
    messages: &[TranscriptMessage],
) -> Result<()> {
    let now = chrono::Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO character_conversations (character_id, messages, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?3) \
         ON CONFLICT(character_id) DO UPDATE SET messages = excluded.messages, updated_at = excluded.updated_at",
        params![character_id, serde_json::to_string(messages)?, now],
    )?;
    Ok(())
}

pub fn delete_transcript(conn: &Connection, character_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM character_conversations WHERE character_id = ?1",
        params![character_id],
    )?;
    Ok(())
}
