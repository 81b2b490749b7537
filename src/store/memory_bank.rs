use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{MemoryItem, MemoryItemPatch, NewMemoryItem};
use super::UpdateSet;

const MUTABLE_COLUMNS: &[&str] = &["name", "type", "size", "source", "status"];

/// Status given to items created without one.
pub const DEFAULT_STATUS: &str = "Pending";

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<MemoryItem> {
    Ok(MemoryItem {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        kind: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        size: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        source: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        status: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

pub fn list_items(conn: &Connection) -> Result<Vec<MemoryItem>> {
    let mut stmt =
        conn.prepare("SELECT id, name, type, size, source, status FROM memory_bank ORDER BY id ASC")?;
    let items = stmt
        .query_map([], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_item(conn: &Connection, id: i64) -> Result<Option<MemoryItem>> {
    Ok(conn
        .query_row(
            "SELECT id, name, type, size, source, status FROM memory_bank WHERE id = ?1",
            params![id],
            row_to_item,
        )
        .optional()?)
}

pub fn create_item(conn: &Connection, new: &NewMemoryItem) -> Result<i64> {
    let status = new.status.as_deref().unwrap_or(DEFAULT_STATUS);
    conn.execute(
        "INSERT INTO memory_bank (name, type, size, source, status) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.name, new.kind, new.size, new.source, status],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Apply a partial update. Returns `false` if nothing matched.
pub fn update_item(conn: &Connection, id: i64, patch: &MemoryItemPatch) -> Result<bool> {
    let mut set = UpdateSet::new(MUTABLE_COLUMNS);
    set.set_opt("name", patch.name.clone())?;
    set.set_opt("type", patch.kind.clone())?;
    set.set_opt("size", patch.size.clone())?;
    set.set_opt("source", patch.source.clone())?;
    set.set_opt("status", patch.status.clone())?;
    Ok(set.execute(conn, "memory_bank", "id", id)? > 0)
}

pub fn delete_item(conn: &Connection, id: i64) -> Result<bool> {
    Ok(conn.execute("DELETE FROM memory_bank WHERE id = ?1", params![id])? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn sample() -> NewMemoryItem {
        NewMemoryItem {
            name: "notes.pdf".into(),
            kind: "pdf".into(),
            size: "2.4 MB".into(),
            source: "upload".into(),
            status: None,
        }
    }

    #[test]
    fn create_defaults_status_to_pending() {
        let conn = db::open_memory_database().unwrap();
        let id = create_item(&conn, &sample()).unwrap();
        let item = get_item(&conn, id).unwrap().unwrap();
        assert_eq!(item.status, DEFAULT_STATUS);
        assert_eq!(item.kind, "pdf");
    }

    #[test]
    fn update_only_present_fields() {
        let conn = db::open_memory_database().unwrap();
        let id = create_item(&conn, &sample()).unwrap();

        let patch = MemoryItemPatch {
            status: Some("Indexed".into()),
            ..Default::default()
        };
        assert!(update_item(&conn, id, &patch).unwrap());

        let item = get_item(&conn, id).unwrap().unwrap();
        assert_eq!(item.status, "Indexed");
        assert_eq!(item.name, "notes.pdf");
    }

    #[test]
    fn delete_removes_item() {
        let conn = db::open_memory_database().unwrap();
        let id = create_item(&conn, &sample()).unwrap();
        assert!(delete_item(&conn, id).unwrap());
        assert!(get_item(&conn, id).unwrap().is_none());
        assert!(list_items(&conn).unwrap().is_empty());
    }
}
