//! Key-value slot operations on the SQLite database.

use rusqlite::{params, OptionalExtension};

use super::{Database, KeyValueStore, StorageResult};

impl KeyValueStore for Database {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_slots WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn.execute("DELETE FROM kv_slots WHERE key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.read("nothing").unwrap(), None);
    }

    #[test]
    fn test_write_then_overwrite() {
        let db = Database::open_in_memory().unwrap();
        db.write("slot", "one").unwrap();
        db.write("slot", "two").unwrap();

        assert_eq!(db.read("slot").unwrap(), Some("two".to_string()));

        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM kv_slots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_remove() {
        let db = Database::open_in_memory().unwrap();
        db.write("slot", "value").unwrap();
        db.remove("slot").unwrap();
        db.remove("slot").unwrap();

        assert_eq!(db.read("slot").unwrap(), None);
    }
}
