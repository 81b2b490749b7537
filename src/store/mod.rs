//! CRUD over the relational store.
//!
//! Every function takes a borrowed `rusqlite::Connection` and is synchronous; the
//! HTTP layer runs them through [`crate::db::Db::call`]. Partial updates go through
//! [`UpdateSet`], which only accepts columns from the caller's fixed allow-list.

pub mod conversations;
pub mod memory_bank;
pub mod personas;
pub mod types;

use anyhow::{bail, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Column assignments collected from a patch struct.
pub(crate) struct UpdateSet {
    allowed: &'static [&'static str],
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl UpdateSet {
    pub(crate) fn new(allowed: &'static [&'static str]) -> Self {
        Self {
            allowed,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Queue `column = value` if the value is present.
    pub(crate) fn set_opt<T: Into<Value>>(&mut self, column: &'static str, value: Option<T>) -> Result<()> {
        match value {
            Some(v) => self.set(column, v),
            None => Ok(()),
        }
    }

    pub(crate) fn set<T: Into<Value>>(&mut self, column: &'static str, value: T) -> Result<()> {
        if !self.allowed.contains(&column) {
            bail!("column is not updatable: {column}");
        }
        self.columns.push(column);
        self.values.push(value.into());
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Execute `UPDATE {table} SET ... WHERE {key_column} = ?`. Returns rows changed.
    pub(crate) fn execute(
        mut self,
        conn: &Connection,
        table: &str,
        key_column: &str,
        key: impl Into<Value>,
    ) -> Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }
        let assignments = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET {assignments} WHERE {key_column} = ?{}",
            self.columns.len() + 1
        );
        self.values.push(key.into());
        Ok(conn.execute(&sql, params_from_iter(self.values))?)
    }
}

/// Decode a JSON array column, treating NULL or empty text as an empty list.
pub(crate) fn decode_json_list<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Result<Vec<T>> {
    match raw.as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: &[&str] = &["name", "status"];

    #[test]
    fn update_set_rejects_unlisted_columns() {
        let mut set = UpdateSet::new(ALLOWED);
        assert!(set.set("name", "x".to_string()).is_ok());
        let err = set.set("id", 4i64).unwrap_err();
        assert!(err.to_string().contains("not updatable"));
    }

    #[test]
    fn update_set_skips_absent_values() {
        let mut set = UpdateSet::new(ALLOWED);
        set.set_opt::<String>("name", None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn decode_json_list_handles_null_and_empty() {
        assert!(decode_json_list::<String>(None).unwrap().is_empty());
        assert!(decode_json_list::<String>(Some(String::new())).unwrap().is_empty());
        assert_eq!(
            decode_json_list::<String>(Some(r#"["a","b"]"#.into())).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
