//! Persistence adapter for echo-health.
//!
//! The store only ever talks to a [`KeyValueStore`]: one opaque string per key.
//! [`Database`] is the durable SQLite implementation, [`MemoryStorage`] the
//! session-only one.

mod schema;
mod slots;
mod memory;

pub use schema::*;
pub use memory::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string slot storage (read / write / remove by key).
pub trait KeyValueStore: Send {
    /// Read a slot; `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Create or overwrite a slot.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a slot. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> StorageResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"kv_slots".to_string()));
    }

    #[test]
    fn test_open_twice_on_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("echo.db");

        let first = Database::open(&path).unwrap();
        first.write("k", "v").unwrap();
        drop(first);

        let second = Database::open(&path).unwrap();
        assert_eq!(second.read("k").unwrap(), Some("v".to_string()));
    }
}
