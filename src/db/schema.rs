//! SQL DDL for all gateway tables.
//!
//! Defines `conversations`, `memory_bank`, `character_personas`,
//! `character_conversations`, the roleplay support tables (`character_memories`,
//! `scenes`, `conversation_scenes`, `character_relationships`), and `schema_meta`.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- Chat history; smart_tags and messages are JSON arrays
CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    smart_tags TEXT,
    is_active INTEGER DEFAULT 0,
    last_updated TEXT,
    messages TEXT
);

-- Memory bank file metadata
CREATE TABLE IF NOT EXISTS memory_bank (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    type TEXT,
    size TEXT,
    source TEXT,
    status TEXT
);

-- Roleplay characters
CREATE TABLE IF NOT EXISTS character_personas (
    character_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    user_relationship TEXT NOT NULL,
    character_role TEXT NOT NULL,
    user_persona_nickname TEXT,
    greeting TEXT,
    short_description TEXT,
    voice_id TEXT,
    visibility TEXT DEFAULT 'private',
    category TEXT DEFAULT 'general',
    tags TEXT,
    definition TEXT,
    is_active INTEGER DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_personas_name ON character_personas(name);

-- One transcript per character
CREATE TABLE IF NOT EXISTS character_conversations (
    character_id TEXT PRIMARY KEY,
    messages TEXT,
    created_at TEXT,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS character_memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    character_id TEXT NOT NULL REFERENCES character_personas(character_id) ON DELETE CASCADE,
    memory_type TEXT NOT NULL CHECK(memory_type IN ('fact','experience','preference')),
    content TEXT NOT NULL,
    importance INTEGER DEFAULT 5,
    created_at TEXT,
    last_referenced TEXT
);

CREATE TABLE IF NOT EXISTS scenes (
    scene_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    location TEXT,
    time_of_day TEXT,
    weather TEXT,
    mood TEXT,
    background_url TEXT,
    is_custom INTEGER DEFAULT 0
);

CREATE TABLE IF NOT EXISTS conversation_scenes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    character_id TEXT NOT NULL REFERENCES character_personas(character_id) ON DELETE CASCADE,
    scene_id TEXT REFERENCES scenes(scene_id),
    activated_at TEXT
);

CREATE TABLE IF NOT EXISTS character_relationships (
    character_id TEXT PRIMARY KEY REFERENCES character_personas(character_id) ON DELETE CASCADE,
    level INTEGER DEFAULT 1,
    stage TEXT DEFAULT 'stranger',
    affection INTEGER DEFAULT 0,
    trust INTEGER DEFAULT 0,
    interactions INTEGER DEFAULT 0,
    first_met TEXT
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
