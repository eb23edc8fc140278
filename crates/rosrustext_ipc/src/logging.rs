//! Injected logging sinks.
//!
//! Endpoints never look a logger up globally; each one is handed a `LogSink` at
//! construction. `TracingLogSink` is the production sink.

use std::sync::{Mutex, PoisonError};

use rosrustext_ipc_core::error::{CoreError, Severity};

/// Destination for endpoint diagnostics. `target` is the endpoint name.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, target: &str, message: &str);

    fn warn(&self, target: &str, message: &str) {
        self.log(Severity::Warn, target, message);
    }
}

/// Forwards to `tracing` with the endpoint name as a structured field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, severity: Severity, target: &str, message: &str) {
        match severity {
            Severity::Trace => tracing::trace!(endpoint = target, "{message}"),
            Severity::Debug => tracing::debug!(endpoint = target, "{message}"),
            Severity::Info => tracing::info!(endpoint = target, "{message}"),
            Severity::Warn => tracing::warn!(endpoint = target, "{message}"),
            Severity::Error | Severity::Fatal => tracing::error!(endpoint = target, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub severity: Severity,
    pub target: String,
    pub message: String,
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingLogSink {
    lines: Mutex<Vec<LogLine>>,
}

impl RecordingLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|line| line.severity == severity)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warn)
    }
}

impl LogSink for RecordingLogSink {
    fn log(&self, severity: Severity, target: &str, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogLine {
                severity,
                target: target.to_string(),
                message: message.to_string(),
            });
    }
}

/// Route a core error through a sink at its own severity.
pub fn log_core_error(sink: &dyn LogSink, target: &str, err: &CoreError) {
    sink.log(err.severity, target, &err.to_string());
}
