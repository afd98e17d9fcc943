//! Custom logging module.
//!
//! This module provides a logger implementation that captures log entries
//! into a bounded buffer shared with the application state for display in
//! the log panel.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Number of entries kept before the oldest are dropped.
///
pub const DEFAULT_CAPACITY: usize = 500;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Shared, bounded list of formatted log lines.
///
#[derive(Clone, Debug)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        LogBuffer::new(DEFAULT_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        LogBuffer {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, entry: String) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Return the newest `count` entries, oldest first.
    ///
    pub fn tail(&self, count: usize) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Logger that writes formatted records into a `LogBuffer`.
///
pub struct CustomLogger {
    level: LevelFilter,
    buffer: LogBuffer,
}

impl CustomLogger {
    pub fn new(level: LevelFilter, buffer: LogBuffer) -> Self {
        CustomLogger { level, buffer }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Below info, only records from this crate
        metadata.level() <= self.level
            && (metadata.level() <= Level::Info || metadata.target().starts_with("crm_tui"))
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.buffer.push(format_log(record));
        }
    }

    fn flush(&self) {}
}

/// Install the global logger. Returns the buffer it writes to.
///
pub fn init(level: LevelFilter) -> Result<LogBuffer, AppError> {
    let buffer = LogBuffer::default();
    log::set_boxed_logger(Box::new(CustomLogger::new(level, buffer.clone())))
        .map_err(|e| AppError::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(buffer)
}
