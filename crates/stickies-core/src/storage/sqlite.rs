//! SQLite-backed key-value storage
//!
//! All keys live in one `kv` table inside `stickies.db`.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::error::{StorageError, StorageResult};
use super::schema::{init_schema, needs_init};
use super::KeyValueStorage;

/// Key-value storage in a SQLite database
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        if needs_init(&conn) {
            init_schema(&conn)?;
        }
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        assert!(storage.get("sticky-notes").unwrap().is_none());

        storage.set("sticky-notes", "[]").unwrap();
        assert_eq!(storage.get("sticky-notes").unwrap().as_deref(), Some("[]"));

        storage.set("sticky-notes", "[1]").unwrap();
        assert_eq!(storage.get("sticky-notes").unwrap().as_deref(), Some("[1]"));

        storage.remove("sticky-notes").unwrap();
        assert!(storage.get("sticky-notes").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_keeps_single_row() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.set("k", "a").unwrap();
        storage.set("k", "b").unwrap();

        let count: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("stickies.db");

        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            storage.set("sticky-notes", "[42]").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.get("sticky-notes").unwrap().as_deref(), Some("[42]"));
    }
}
