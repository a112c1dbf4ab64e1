//! Controller states
//!
//! - `Off`: absorbing; only `turn_on` leaves it
//! - `Idle`: resting, holding no heading target
//! - `Turning`: transient, until the heading converges on the target

use std::fmt;

use crate::dispatch::OneOf;
use crate::variant::Variant;

/// The controller is switched off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Off;

/// The controller is on and holding its heading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Idle;

/// The controller is turning towards `target_heading` (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turning {
    pub target_heading: f32,
}

impl fmt::Display for Off {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "off{{}}")
    }
}

impl fmt::Display for Idle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "idle{{}}")
    }
}

impl fmt::Display for Turning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turning{{{}}}", self.target_heading)
    }
}

crate::variant! {
    /// Controller state.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum State {
        Off(Off),
        Idle(Idle),
        Turning(Turning),
    }
}

/// Any state in which the controller is switched on.
pub type On = OneOf<(Idle, Turning)>;

impl Default for State {
    fn default() -> Self {
        State::from(Off)
    }
}

impl State {
    /// Turning towards `target_heading`.
    pub fn turning(target_heading: f32) -> Self {
        State::from(Turning { target_heading })
    }

    /// Lowercase state name: `off`, `idle` or `turning`.
    pub fn state_name(&self) -> &'static str {
        match self {
            State::Off(_) => "off",
            State::Idle(_) => "idle",
            State::Turning(_) => "turning",
        }
    }

    pub fn is_on(&self) -> bool {
        !self.holds::<Off>()
    }

    /// Target heading while turning.
    pub fn target_heading(&self) -> Option<f32> {
        self.get::<Turning>().map(|turning| turning.target_heading)
    }

    /// Parse a resting state name. `turning` needs a target and is rejected.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "off" => Some(State::from(Off)),
            "idle" => Some(State::from(Idle)),
            _ => None,
        }
    }
}
