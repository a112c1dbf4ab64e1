//! Observability subsystem for helmsman
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Typed lifecycle and dispatch events
//! - A per-thread injectable sink
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on variant or dispatch results
//! 3. No background threads
//! 4. Nothing is formatted unless a sink wants the severity
//!
//! # Usage
//!
//! ```ignore
//! use helmsman::observability::{self, Event, MemorySink, Severity};
//!
//! let sink = MemorySink::new(Severity::Trace);
//! let _guard = observability::install_sink(sink.clone());
//! // ... construct, assign, dispatch ...
//! assert!(!sink.records_named("VARIANT_CONSTRUCT").is_empty());
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{JsonSink, LogRecord, LogSink, Logger, MemorySink, Severity};

use std::cell::{Cell, RefCell};
use std::fmt;

thread_local! {
    /// Installed sinks, innermost last; the last one receives records.
    static SINKS: RefCell<Vec<(u64, Box<dyn LogSink>)>> = const { RefCell::new(Vec::new()) };
    static NEXT_INSTALL: Cell<u64> = const { Cell::new(0) };
    static EMITTING: Cell<bool> = const { Cell::new(false) };
}

/// Observability error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityErrorCode {
    /// A sink could not accept a record
    HelmObservabilityFailed,
}

impl ObservabilityErrorCode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservabilityErrorCode::HelmObservabilityFailed => "HELM_OBSERVABILITY_FAILED",
        }
    }
}

impl fmt::Display for ObservabilityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability error
///
/// Observability failure is never fatal and never alters a result.
#[derive(Debug)]
pub struct ObservabilityError {
    code: ObservabilityErrorCode,
    message: String,
}

impl ObservabilityError {
    /// Create a new observability error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ObservabilityErrorCode::HelmObservabilityFailed,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ObservabilityErrorCode {
        self.code
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Observability errors are never fatal
    pub fn is_fatal(&self) -> bool {
        false
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Uninstalls its sink when dropped.
///
/// Guards may be dropped in any order: dropping one removes exactly the
/// sink it installed, and the most recent sink still installed receives
/// records.
#[must_use = "the sink is uninstalled as soon as the guard is dropped"]
pub struct SinkGuard {
    install: u64,
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        SINKS.with(|sinks| {
            if let Ok(mut sinks) = sinks.try_borrow_mut() {
                sinks.retain(|(install, _)| *install != self.install);
            }
        });
    }
}

/// Install `sink` for the current thread until the guard is dropped.
pub fn install_sink(sink: impl LogSink + 'static) -> SinkGuard {
    let install = NEXT_INSTALL.with(|next| {
        let install = next.get();
        next.set(install.wrapping_add(1));
        install
    });
    SINKS.with(|sinks| sinks.borrow_mut().push((install, Box::new(sink))));
    SinkGuard { install }
}

/// Whether the current thread's sink wants records of `severity`.
///
/// Call sites use this to skip building fields nobody will read.
pub fn enabled(severity: Severity) -> bool {
    SINKS.with(|sinks| match sinks.try_borrow() {
        Ok(sinks) => sinks
            .last()
            .is_some_and(|(_, sink)| severity >= sink.min_severity()),
        Err(_) => false,
    })
}

/// Clears the emitting flag even if the sink panics.
struct EmittingReset;

impl Drop for EmittingReset {
    fn drop(&mut self) {
        EMITTING.with(|flag| flag.set(false));
    }
}

/// Send a record to the current thread's sink, if any.
///
/// Records emitted while the sink is itself running are dropped.
pub fn emit(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    if EMITTING.with(Cell::get) {
        return;
    }
    SINKS.with(|sinks| {
        if let Ok(sinks) = sinks.try_borrow() {
            if let Some((_, sink)) = sinks.last() {
                if severity >= sink.min_severity() {
                    EMITTING.with(|flag| flag.set(true));
                    let _reset = EmittingReset;
                    let _ = sink.record(severity, event.as_str(), fields);
                }
            }
        }
    });
}

/// Log a lifecycle event directly through [`Logger`]
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    if event.is_fatal() {
        Logger::fatal(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}
