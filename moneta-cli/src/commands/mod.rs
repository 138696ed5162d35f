//! CLI command implementations

pub mod convert;
pub mod logs;
pub mod rates;
pub mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use moneta_core::{EntryPoint, LogEvent, LoggingService, MonetaContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the moneta data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MONETA_DIR") {
        PathBuf::from(dir)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".moneta")
    } else {
        // No home directory; fall back to the working directory
        PathBuf::from(".moneta")
    }
}

/// Get or create moneta context
pub fn get_context() -> Result<MonetaContext> {
    let data_dir = get_data_dir();

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create moneta directory: {:?}", data_dir))?;

    MonetaContext::new(&data_dir).context("Failed to initialize moneta context")
}
