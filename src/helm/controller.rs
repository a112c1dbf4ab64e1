//! Heading controller
//!
//! Owns the current state and a prebuilt transition table. Each event is
//! dispatched against the pair (state, event) and the result replaces the
//! state in place.
//!
//! The controller is single-threaded; share it behind a mutex if needed.

use super::config::ControllerConfig;
use super::errors::ControllerResult;
use super::event::Event;
use super::state::State;
use super::transition::transition_visitor;
use crate::dispatch::Multivisitor;
use crate::observability::{self, Event as LogEvent, Severity};
use crate::variant::Variant;

/// Heading controller
pub struct HeadingController {
    config: ControllerConfig,
    state: State,
    visitor: Multivisitor<'static, (State, Event), State>,
    transitions_applied: u64,
}

impl HeadingController {
    /// Create a controller from a validated configuration.
    pub fn new(config: ControllerConfig) -> ControllerResult<Self> {
        config.validate()?;
        let state = config.initial_state()?;
        let visitor = transition_visitor(config.heading_tolerance)?;
        Ok(Self {
            config,
            state,
            visitor,
            transitions_applied: 0,
        })
    }

    /// Off, default tolerance.
    pub fn with_defaults() -> ControllerResult<Self> {
        Self::new(ControllerConfig::default())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Number of events applied since creation or the last `reset_to`.
    pub fn transitions_applied(&self) -> u64 {
        self.transitions_applied
    }

    /// Apply one event and return the new state.
    ///
    /// On error the state is unchanged.
    pub fn apply(&mut self, event: &Event) -> ControllerResult<&State> {
        let next = self.visitor.dispatch((&self.state, event))?;

        if observability::enabled(Severity::Info) {
            let count = (self.transitions_applied + 1).to_string();
            let from = self.state.to_string();
            let to = next.to_string();
            let rendered = event.to_string();
            observability::emit(
                Severity::Info,
                LogEvent::TransitionApplied,
                &[
                    ("event", &rendered),
                    ("from", &from),
                    ("sequence", &count),
                    ("to", &to),
                ],
            );
        }

        self.state.assign(next);
        self.transitions_applied += 1;
        Ok(&self.state)
    }

    /// Apply events in order, stopping at the first failure.
    pub fn apply_all<'e>(
        &mut self,
        events: impl IntoIterator<Item = &'e Event>,
    ) -> ControllerResult<&State> {
        for event in events {
            self.apply(event)?;
        }
        Ok(&self.state)
    }

    /// Force the controller into `state` and restart the counter.
    pub fn reset_to(&mut self, state: State) {
        self.state.assign(state);
        self.transitions_applied = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helm::event::TurnOn;
    use crate::helm::state::{Idle, Off};
    use crate::observability::MemorySink;

    #[test]
    fn test_starts_in_configured_state() {
        let controller = HeadingController::with_defaults().unwrap();
        assert_eq!(controller.state(), &State::Off(Off));
        assert_eq!(controller.transitions_applied(), 0);

        let config = ControllerConfig {
            initial_state: "idle".to_string(),
            ..ControllerConfig::default()
        };
        let controller = HeadingController::new(config).unwrap();
        assert_eq!(controller.state(), &State::Idle(Idle));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ControllerConfig {
            heading_tolerance: f32::NAN,
            ..ControllerConfig::default()
        };
        assert!(HeadingController::new(config).is_err());
    }

    #[test]
    fn test_apply_counts_transitions() {
        let mut controller = HeadingController::with_defaults().unwrap();
        controller.apply(&Event::from(TurnOn)).unwrap();
        controller.apply(&Event::start_turning(30.0)).unwrap();

        assert_eq!(controller.state(), &State::turning(30.0));
        assert_eq!(controller.transitions_applied(), 2);
    }

    #[test]
    fn test_apply_all() {
        let mut controller = HeadingController::with_defaults().unwrap();
        let events = [
            Event::from(TurnOn),
            Event::start_turning(42.0),
            Event::heading_changed(101.0),
            Event::heading_changed(42.0),
        ];
        let state = controller.apply_all(&events).unwrap();
        assert_eq!(state, &State::Idle(Idle));
        assert_eq!(controller.transitions_applied(), 4);
    }

    #[test]
    fn test_reset_to() {
        let mut controller = HeadingController::with_defaults().unwrap();
        controller.apply(&Event::from(TurnOn)).unwrap();
        controller.reset_to(State::turning(5.0));

        assert_eq!(controller.state(), &State::turning(5.0));
        assert_eq!(controller.transitions_applied(), 0);
    }

    #[test]
    fn test_transitions_are_logged() {
        let sink = MemorySink::new(Severity::Info);
        let _guard = observability::install_sink(sink.clone());

        let mut controller = HeadingController::with_defaults().unwrap();
        controller.apply(&Event::from(TurnOn)).unwrap();

        let records = sink.records_named("TRANSITION_APPLIED");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("from"), Some("variant[0]: off{}"));
        assert_eq!(records[0].field("to"), Some("variant[1]: idle{}"));
        assert_eq!(records[0].field("event"), Some("variant[0]: turn_on{}"));
        assert_eq!(records[0].field("sequence"), Some("1"));
    }
}
