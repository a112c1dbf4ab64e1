//! Observable events
//!
//! Events are explicit and typed; the string form is what sinks receive.

use std::fmt;

/// Observable events in helmsman
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Variant lifecycle
    /// Variant constructed from an alternative
    VariantConstruct,
    /// Live alternative replaced
    VariantAssign,
    /// Variant copied
    VariantCopy,

    // Dispatch
    /// Multivisitor resolution table built
    DispatchTableBuilt,
    /// A handler was selected for a combination
    DispatchResolved,
    /// No handler could be selected (FATAL)
    DispatchFailed,
    /// An arm can never be selected
    HandlerUnreachable,

    // Controller
    /// Controller state changed (or stayed) after an event
    TransitionApplied,
    /// Controller configuration loaded
    ConfigLoaded,

    // Demonstration program
    /// Scripted demo started
    DemoStart,
    /// Scripted demo finished
    DemoComplete,
    /// Memory layout reported
    LayoutReport,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::VariantConstruct => "VARIANT_CONSTRUCT",
            Event::VariantAssign => "VARIANT_ASSIGN",
            Event::VariantCopy => "VARIANT_COPY",
            Event::DispatchTableBuilt => "DISPATCH_TABLE_BUILT",
            Event::DispatchResolved => "DISPATCH_RESOLVED",
            Event::DispatchFailed => "DISPATCH_FAILED",
            Event::HandlerUnreachable => "HANDLER_UNREACHABLE",
            Event::TransitionApplied => "TRANSITION_APPLIED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DemoStart => "DEMO_START",
            Event::DemoComplete => "DEMO_COMPLETE",
            Event::LayoutReport => "LAYOUT_REPORT",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::DispatchFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
