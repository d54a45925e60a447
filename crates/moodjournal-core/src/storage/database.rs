//! SQLite-backed key-value store.
//!
//! Every persisted document (entry list, goal list, custom activities,
//! security settings, unlock timestamp, PIN, scheduled notifications) is a
//! single JSON string stored under a fixed key. Writers always replace the
//! whole value, so concurrent read-modify-write cycles are last-write-wins.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::{CoreError, StorageError};

/// SQLite database holding the `kv` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/moodjournal/moodjournal.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("moodjournal.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path, creating parent directories.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::QueryFailed(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened journal store");
        Ok(db)
    }

    /// Open an in-memory database (for tests and dry runs).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        tracing::debug!(key, bytes = value.len(), "kv write");
        Ok(())
    }

    /// Remove a key. Missing keys are not an error.
    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Decode the JSON document stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv_get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it under `key`, replacing any
    /// previous document.
    pub fn store_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv_set(key, &raw)?;
        Ok(())
    }

    /// Load a list document, treating a missing key or any read failure as
    /// an empty list. Failures are logged, never surfaced.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.load_json::<Vec<T>>(key) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read list; using empty list");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn json_documents() {
        let db = Database::open_memory().unwrap();
        db.store_json("numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<i32>> = db.load_json("numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn corrupt_document_is_reported_but_list_reads_empty() {
        let db = Database::open_memory().unwrap();
        db.kv_set("entries", "{not json").unwrap();

        let err = db.load_json::<Vec<i32>>("entries").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));

        let items: Vec<i32> = db.load_list("entries");
        assert!(items.is_empty());
    }

    #[test]
    fn open_at_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("journal.db");
        let db = Database::open_at(&path).unwrap();
        db.kv_set("k", "v").unwrap();
        drop(db);

        let reopened = Database::open_at(&path).unwrap();
        assert_eq!(reopened.kv_get("k").unwrap().as_deref(), Some("v"));
    }
}
