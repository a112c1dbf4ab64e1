//! Heading controller
//!
//! A turn/heading state machine whose states and events are both closed
//! variants, driven by a two-variant multivisitor:
//! - `off` is absorbing: only `turn_on` leaves it
//! - `idle` rests until told to turn
//! - `turning` lasts until the heading converges on its target
//!
//! All transitions are synchronous and deterministic. Rule order is part
//! of the behavior; see [`transition_table`].

mod config;
mod controller;
mod errors;
mod event;
mod state;
mod transition;

pub use config::ControllerConfig;
pub use controller::HeadingController;
pub use errors::{ControllerError, ControllerResult};
pub use event::{Event, HeadingChanged, Reset, StartTurning, TurnOff, TurnOn};
pub use state::{Idle, Off, On, State, Turning};
pub use transition::{
    heading_reached, transition, transition_table, transition_visitor, DEFAULT_HEADING_TOLERANCE,
};
