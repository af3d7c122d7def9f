//! Integration tests for the logging system

use async_trait::async_trait;
use bridge_traits::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sink that records every entry it is handed.
#[derive(Default)]
struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl CapturingSink {
    fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }
}

#[async_trait]
impl LoggerSink for CapturingSink {
    async fn log(&self, entry: LogEntry) -> bridge_traits::Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[cfg(not(debug_assertions))]
    {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
    }
}

#[test]
fn test_filter_configuration() {
    let config = LoggingConfig::default().with_filter("bridge_http=debug,core_runtime=trace");

    assert_eq!(
        config.filter,
        Some("bridge_http=debug,core_runtime=trace".to_string())
    );
}

// The global subscriber can only be installed once per process, so the
// whole mirror path is exercised in a single test.
#[tokio::test]
async fn test_events_are_mirrored_to_the_sink() {
    let sink = Arc::new(CapturingSink::default());

    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(Arc::clone(&sink) as Arc<dyn LoggerSink>);
    init_logging(config).expect("logging should initialize once");

    tracing::info!(target: "bridge_http", capability = "geo", "executing bridge request");
    tracing::trace!(target: "bridge_http", "below the sink level");

    // Sink forwarding is spawned; give it a moment to drain.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let messages = sink.messages();
    assert!(messages.contains(&"executing bridge request".to_string()));
    assert!(!messages.contains(&"below the sink level".to_string()));

    let entries = sink.entries.lock().unwrap();
    let entry = entries
        .iter()
        .find(|entry| entry.message == "executing bridge request")
        .unwrap();
    assert_eq!(entry.target, "bridge_http");
    assert_eq!(entry.fields.get("capability"), Some(&"geo".to_string()));
}
