//! SQLite schema definition.

/// Key-value slot schema backing the persistence adapter.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-Value Slots
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- serialized JSON blob
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
