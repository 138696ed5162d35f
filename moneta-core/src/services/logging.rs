//! Logging service - structured event logging to a JSON Lines file
//!
//! Provides a privacy-safe logging system that appends events to
//! logs.jsonl in the data directory. No user data (usernames, passwords,
//! amounts) is ever logged, only event names and error text.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    // Lower 48 bits of timestamp, upper 16 bits of counter
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Current unix timestamp in milliseconds
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Entry point for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LogEvent {
    /// Create a new log event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            error_message: None,
        }
    }

    /// Set the command context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A log entry as stored on disk, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Service for structured event logging
pub struct LoggingService {
    file: Mutex<File>,
    log_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open (or create) the log file in the given data directory
    pub fn new(data_dir: &Path, entry_point: EntryPoint, app_version: &str) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let log_path = data_dir.join("logs.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            file: Mutex::new(file),
            log_path,
            entry_point,
            app_version: app_version.to_string(),
            platform: detect_platform(),
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one event
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: generate_id(),
            timestamp: now_ms(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            command: event.command,
            error_message: event.error_message,
        };

        let line = serde_json::to_string(&entry)?;
        let mut file = self
            .file
            .lock()
            .map_err(|_| Error::Other("log file mutex poisoned".to_string()))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Read the most recent entries, newest last
    pub fn tail(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let entries = self.read_entries()?;
        Ok(keep_newest(entries, limit))
    }

    /// Read the most recent error entries, newest last
    ///
    /// The limit applies after filtering, so this returns the last
    /// `limit` errors no matter how many other events surround them.
    pub fn errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_entries()?;
        entries.retain(|e| e.error_message.is_some());
        Ok(keep_newest(entries, limit))
    }

    /// Parse the whole log file
    ///
    /// Unparseable lines are skipped; a partially written tail must not
    /// make the history unreadable.
    fn read_entries(&self) -> Result<Vec<LogEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.log_path)?);
        Ok(reader
            .lines()
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect())
    }
}

/// Drop all but the last `limit` entries
fn keep_newest(mut entries: Vec<LogEntry>, limit: usize) -> Vec<LogEntry> {
    if entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_and_tail() {
        let dir = TempDir::new().unwrap();
        let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "0.1.0").unwrap();

        logger.log(LogEvent::new("login_succeeded").with_command("shell")).unwrap();
        logger
            .log(LogEvent::new("convert_failed").with_error("unknown currency: XXX"))
            .unwrap();

        let entries = logger.tail(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "login_succeeded");
        assert_eq!(entries[0].entry_point, "cli");
        assert_eq!(
            entries[1].error_message.as_deref(),
            Some("unknown currency: XXX")
        );
    }

    #[test]
    fn test_tail_limit_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "0.1.0").unwrap();
        for i in 0..5 {
            logger.log(LogEvent::new(format!("event_{}", i))).unwrap();
        }

        let entries = logger.tail(2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "event_3");
        assert_eq!(entries[1].event, "event_4");
    }

    #[test]
    fn test_tail_skips_garbage_lines() {
        let dir = TempDir::new().unwrap();
        let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "0.1.0").unwrap();
        logger.log(LogEvent::new("good")).unwrap();
        fs::write(
            logger.log_path(),
            format!("{}\nnot json\n", fs::read_to_string(logger.log_path()).unwrap()),
        )
        .unwrap();

        let entries = logger.tail(10).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_errors_limit_applies_after_filtering() {
        let dir = TempDir::new().unwrap();
        let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "0.1.0").unwrap();

        // Errors interleaved with more non-errors than the limit
        for i in 0..4 {
            logger
                .log(LogEvent::new(format!("fail_{}", i)).with_error("boom"))
                .unwrap();
            for j in 0..3 {
                logger.log(LogEvent::new(format!("ok_{}_{}", i, j))).unwrap();
            }
        }

        let errors = logger.errors(2).unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].event, "fail_2");
        assert_eq!(errors[1].event, "fail_3");
        assert!(errors.iter().all(|e| e.error_message.is_some()));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}
