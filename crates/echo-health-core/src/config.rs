//! Store configuration and fixed limits.

use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Echo Health";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key of the durable slot holding the persisted store blob.
pub const STORAGE_NAMESPACE: &str = "echo-health-storage";

/// Maximum number of vitals retained (oldest evicted first).
pub const VITALS_CAPACITY: usize = 1000;

/// Maximum number of consultation receipts retained.
pub const RECEIPT_CAPACITY: usize = 100;

/// Countdown value an SOS alert starts from.
pub const SOS_COUNTDOWN_SECS: u32 = 10;

/// Vita Points needed per level.
pub const POINTS_PER_LEVEL: u64 = 1000;

/// Prompt summaries longer than this are truncated with an ellipsis.
pub const PROMPT_SUMMARY_CHARS: usize = 80;

/// Environment variable naming the SQLite file backing the store.
pub const DB_PATH_ENV: &str = "ECHO_HEALTH_DB";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,echo_health_core=debug,echo_health_assistant=debug"
}

/// Where and under which key the store persists itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// SQLite file; `None` keeps the store in memory for the session.
    pub db_path: Option<PathBuf>,
    /// Durable slot key.
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            namespace: STORAGE_NAMESPACE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        let db_path = std::env::var_os(DB_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            db_path,
            ..Self::default()
        }
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_in_memory() {
        let config = StoreConfig::default();
        assert!(config.db_path.is_none());
        assert_eq!(config.namespace, "echo-health-storage");
    }

    #[test]
    fn with_db_path_sets_path() {
        let config = StoreConfig::default().with_db_path("/tmp/echo.db");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/echo.db")));
    }

    #[test]
    fn app_name_is_echo_health() {
        assert_eq!(APP_NAME, "Echo Health");
    }
}
