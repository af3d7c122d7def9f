//! Logging Abstractions
//!
//! Forwards structured logs from the bridge core to host logging pipelines
//! (Logcat on the Android shell, OSLog on iOS, the console in tests).
//! Payload fields go through the describing serializer variant, so binary
//! request bodies are summarized rather than dumped into host logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::payload::{self, BridgeValue};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Originating module or component.
    pub target: String,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach a payload field rendered through the describing serializer:
    /// binary values appear as a size placeholder, never as raw bytes.
    pub fn with_payload(self, key: impl Into<String>, value: &BridgeValue) -> Self {
        self.with_field(key, payload::describe(value))
    }
}

/// Forwards structured logs to the host logging system.
///
/// Implementations must never log secrets; the transport keeps the
/// shared-secret header out of log entries entirely.
#[async_trait]
pub trait LoggerSink: Send + Sync {
    /// Forward a log entry.
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Flush any buffered entries.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Minimum level the sink will process; lower entries may be filtered
    /// at the source.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Console sink for tests and development.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

#[async_trait]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            let level = match entry.level {
                LogLevel::Trace => "TRACE",
                LogLevel::Debug => "DEBUG",
                LogLevel::Info => "INFO",
                LogLevel::Warn => "WARN",
                LogLevel::Error => "ERROR",
            };
            println!(
                "[{}] {} {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                level,
                entry.target,
                entry.message
            );
            if !entry.fields.is_empty() {
                println!("  fields: {:?}", entry.fields);
            }
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
