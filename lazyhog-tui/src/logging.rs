//! File-backed tracing setup. The terminal belongs to the UI, so nothing is
//! ever written to stdout or stderr while it runs.

use crate::error::TuiError;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Variable holding the filter directives, e.g. `lazyhog=debug`.
pub const LOG_ENV: &str = "LAZYHOG_LOG";
pub const DEFAULT_FILTER: &str = "lazyhog=info,lazyhog_tui=info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `path`, creating parent
/// directories as needed. The file is truncated on each start.
pub fn init(path: &Path) -> Result<(), TuiError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter())
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))
}
