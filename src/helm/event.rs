//! Controller events
//!
//! Textual form, as read by the CLI: `turn_on`, `turn_off`,
//! `start_turning:<deg>`, `reset:<reason>`, `heading_changed:<deg>`.

use std::fmt;
use std::str::FromStr;

use super::errors::ControllerError;

/// Switch the controller on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnOn;

/// Switch the controller off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnOff;

/// Begin turning towards `target_heading` (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartTurning {
    pub target_heading: f32,
}

/// Abandon whatever the controller is doing.
#[derive(Debug, Clone, PartialEq)]
pub struct Reset {
    pub reason: String,
}

/// The measured heading changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingChanged {
    pub heading: f32,
}

impl fmt::Display for TurnOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn_on{{}}")
    }
}

impl fmt::Display for TurnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn_off{{}}")
    }
}

impl fmt::Display for StartTurning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "start_turning{{{}}}", self.target_heading)
    }
}

impl fmt::Display for Reset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reset{{{}}}", self.reason)
    }
}

impl fmt::Display for HeadingChanged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heading_changed{{{}}}", self.heading)
    }
}

crate::variant! {
    /// Controller input.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        TurnOn(TurnOn),
        TurnOff(TurnOff),
        StartTurning(StartTurning),
        Reset(Reset),
        HeadingChanged(HeadingChanged),
    }
}

impl Event {
    pub fn start_turning(target_heading: f32) -> Self {
        Event::from(StartTurning { target_heading })
    }

    pub fn reset(reason: impl Into<String>) -> Self {
        Event::from(Reset {
            reason: reason.into(),
        })
    }

    pub fn heading_changed(heading: f32) -> Self {
        Event::from(HeadingChanged { heading })
    }

    /// Lowercase event name, as accepted by `from_str`.
    pub fn event_name(&self) -> &'static str {
        match self {
            Event::TurnOn(_) => "turn_on",
            Event::TurnOff(_) => "turn_off",
            Event::StartTurning(_) => "start_turning",
            Event::Reset(_) => "reset",
            Event::HeadingChanged(_) => "heading_changed",
        }
    }
}

impl FromStr for Event {
    type Err = ControllerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (name, argument) = match trimmed.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (trimmed, None),
        };

        let invalid = |reason: &str| ControllerError::InvalidEvent {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let heading = |argument: Option<&str>| -> Result<f32, ControllerError> {
            let text = argument.ok_or_else(|| invalid("missing heading"))?;
            let value: f32 = text.parse().map_err(|_| invalid("heading is not a number"))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(invalid("heading must be finite"))
            }
        };

        match (name.to_ascii_lowercase().as_str(), argument) {
            ("turn_on", None) => Ok(Event::from(TurnOn)),
            ("turn_off", None) => Ok(Event::from(TurnOff)),
            ("turn_on" | "turn_off", Some(_)) => Err(invalid("takes no argument")),
            ("start_turning", argument) => Ok(Event::start_turning(heading(argument)?)),
            ("heading_changed", argument) => Ok(Event::heading_changed(heading(argument)?)),
            ("reset", argument) => Ok(Event::reset(argument.unwrap_or_default())),
            _ => Err(invalid("unknown event")),
        }
    }
}
