//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config;

/// Install a fmt subscriber filtered by `RUST_LOG` (or the crate default).
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} core v{} logging initialized", config::APP_NAME, config::APP_VERSION);
    }
    installed
}
