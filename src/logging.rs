//! Structured logging for hstats
//!
//! This module provides:
//! - Leveled logging with console and JSON output
//! - Structured fields attached through a builder
//! - A probe-specific logger for per-host diagnostics
//!
//! Every entry is written to standard error. Standard output carries only
//! the ranked report, so it stays machine-parseable when probes fail.

use crate::error::AppError;
use crate::models::{Config, HostStat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug level - detailed information for debugging
    Debug = 0,
    /// Info level - general application information
    Info = 1,
    /// Warning level - per-host failures land here
    Warn = 2,
    /// Error level - error events but application can continue
    Error = 3,
    /// Fatal level - severe error events that cause application termination
    Fatal = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Fatal => "\x1b[35m",    // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Additional structured fields
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            min_level: LogLevel::Warn,
            use_color: false,
            format: LogFormat::Console,
            name: name.into(),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: impl Into<String>, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.into(),
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Render an entry, or `None` when it is below the minimum level
    pub fn render(&self, entry: LogEntry) -> Option<String> {
        if !self.would_log(entry.level) {
            return None;
        }

        Some(match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
        })
    }

    fn write_entry(&self, entry: LogEntry) {
        if let Some(output) = self.render(entry) {
            let _ = writeln!(io::stderr().lock(), "{}", output);
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}", entry.message),
        }
    }

}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
    }

    /// Add host statistics
    pub fn stat(self, stat: &HostStat) -> Self {
        self.field("host", &stat.host)
            .field("min_ms", stat.min)
            .field("avg_ms", stat.avg)
            .field("max_ms", stat.max)
            .field("jitter_ms", stat.jitter())
    }

    /// Built entry, for callers that render it themselves
    pub fn into_entry(self) -> LogEntry {
        self.entry
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Specialized logger for probe lifecycle events
#[derive(Debug, Clone)]
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(config: &Config) -> Self {
        Self { logger: Logger::with_config("probe", config) }
    }

    /// Logger that drops everything below `Fatal`
    pub fn quiet() -> Self {
        let mut logger = Logger::new("probe");
        logger.set_level(LogLevel::Fatal);
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn probe_started(&self, worker: usize, host: &str) {
        self.logger.debug("Probe started")
            .field("worker", worker)
            .field("host", host)
            .log();
    }

    pub fn probe_finished(&self, worker: usize, stat: &HostStat) {
        self.logger.debug("Probe finished")
            .field("worker", worker)
            .stat(stat)
            .log();
    }

    /// Per-host failure; the host still gets a sentinel row
    pub fn probe_failed(&self, host: &str, reason: &str) {
        self.logger.warn(&format!("probe {}: {}", host, reason))
            .field("host", host)
            .log();
    }

    pub fn dispatch_summary(&self, hosts: usize, workers: usize, failed: usize, cancelled: bool, elapsed_ms: f64) {
        self.logger.info("Dispatch finished")
            .field("hosts", hosts)
            .field("workers", workers)
            .field("failed", failed)
            .field("cancelled", cancelled)
            .field("elapsed_ms", elapsed_ms)
            .log();
    }
}
