//! Structured JSON logger and log sinks
//!
//! - One log line = one record
//! - `event` first, `severity` second, remaining keys sorted
//! - Synchronous, no buffering
//! - Write failures are dropped; logging never changes a result

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use super::ObservabilityResult;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Construction, assignment and dispatch detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Suspicious but valid (e.g. unreachable handlers)
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    ///
    /// Fields are output in deterministic order (alphabetical by key)
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(severity, event, fields, &mut io::stdout());
    }

    /// Log to stderr (for errors and fatal messages)
    pub fn log_stderr(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    pub(crate) fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let line = Self::render(severity, event, fields);

        // One write per record
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Render one record as a JSON line (newline included)
    pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);

        output.push_str("{\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push_str("}\n");
        output
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Severity::Fatal, event, fields);
    }
}

/// Destination for leveled log records.
///
/// Sinks are advisory: a failing sink must not change what the caller
/// computes, so callers discard the returned error.
pub trait LogSink {
    /// Lowest severity this sink wants to receive.
    fn min_severity(&self) -> Severity;

    /// Accept one record.
    fn record(
        &self,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> ObservabilityResult<()>;
}

/// Sink writing JSON lines through [`Logger`].
#[derive(Debug, Clone, Copy)]
pub struct JsonSink {
    min_severity: Severity,
}

impl JsonSink {
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }
}

impl LogSink for JsonSink {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn record(
        &self,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> ObservabilityResult<()> {
        if severity >= Severity::Error {
            Logger::log_stderr(severity, event, fields);
        } else {
            Logger::log(severity, event, fields);
        }
        Ok(())
    }
}

/// A captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub severity: Severity,
    pub event: String,
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    /// Value of the first field named `key`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sink that keeps records in memory.
///
/// Clones share the same buffer, so one clone can be installed while
/// another is kept for inspection.
#[derive(Debug, Clone)]
pub struct MemorySink {
    min_severity: Severity,
    records: Rc<RefCell<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new(min_severity: Severity) -> Self {
        Self {
            min_severity,
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Snapshot of every captured record, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }

    /// Captured records with the given event name.
    pub fn records_named(&self, event: &str) -> Vec<LogRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.event == event)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn record(
        &self,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> ObservabilityResult<()> {
        self.records.borrow_mut().push(LogRecord {
            severity,
            event: event.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        Ok(())
    }
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
