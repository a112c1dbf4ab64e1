//! Transition table
//!
//! Rules are tried top to bottom and the first match wins, so the
//! catch-alls must stay below the rules they would otherwise hide:
//!
//! | # | state      | event               | next                          |
//! |---|------------|---------------------|-------------------------------|
//! | 1 | off        | turn_on             | idle                          |
//! | 2 | off        | _                   | off                           |
//! | 3 | on         | turn_off            | off                           |
//! | 4 | _          | turn_on             | unchanged                     |
//! | 5 | on         | reset               | idle                          |
//! | 6 | on         | start_turning(t)    | turning(t)                    |
//! | 7 | idle       | heading_changed     | unchanged                     |
//! | 8 | turning(t) | heading_changed(h)  | idle if \|h - t\| < tolerance |

use super::errors::ControllerResult;
use super::event::{Event, HeadingChanged, Reset, StartTurning, TurnOff, TurnOn};
use super::state::{Idle, Off, On, State, Turning};
use crate::dispatch::{Any, DispatchResult, Multivisitor, OverloadSet};

/// Heading error, in degrees, below which a turn is complete.
pub const DEFAULT_HEADING_TOLERANCE: f32 = 0.1;

/// Whether `heading` is within `tolerance` of `target`.
pub fn heading_reached(target: f32, heading: f32, tolerance: f32) -> bool {
    (heading - target).abs() < tolerance
}

/// The ordered rule set, unchecked.
pub fn transition_table(tolerance: f32) -> OverloadSet<'static, (State, Event), State> {
    OverloadSet::new()
        .case::<(Off, TurnOn)>(|_: &Off, _: &TurnOn| State::from(Idle))
        .case::<(Off, Any)>(|_: &Off, _: &Event| State::from(Off))
        .case::<(On, TurnOff)>(|_: &State, _: &TurnOff| State::from(Off))
        .case::<(Any, TurnOn)>(|state: &State, _: &TurnOn| *state)
        .case::<(On, Reset)>(|_: &State, _: &Reset| State::from(Idle))
        .case::<(On, StartTurning)>(|_: &State, event: &StartTurning| {
            State::turning(event.target_heading)
        })
        .case::<(Idle, HeadingChanged)>(|_: &Idle, _: &HeadingChanged| State::from(Idle))
        .case::<(Turning, HeadingChanged)>(move |turning: &Turning, event: &HeadingChanged| {
            if heading_reached(turning.target_heading, event.heading, tolerance) {
                State::from(Idle)
            } else {
                State::from(*turning)
            }
        })
}

/// The rule set, checked for exhaustiveness and tabulated.
pub fn transition_visitor(tolerance: f32) -> DispatchResult<Multivisitor<'static, (State, Event), State>> {
    transition_table(tolerance).build()
}

/// Next state after `event`, with the default tolerance.
///
/// Builds the table on every call; [`HeadingController`](super::HeadingController)
/// builds it once.
pub fn transition(state: &State, event: &Event) -> ControllerResult<State> {
    let visitor = transition_visitor(DEFAULT_HEADING_TOLERANCE)?;
    Ok(visitor.dispatch((state, event))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{install_sink, MemorySink, Severity};

    fn idle() -> State {
        State::from(Idle)
    }

    fn off() -> State {
        State::from(Off)
    }

    // =========================================================================
    // TABLE
    // =========================================================================

    #[test]
    fn test_table_is_exhaustive_without_dead_rules() {
        let sink = MemorySink::new(Severity::Warn);
        let _guard = install_sink(sink.clone());

        let visitor = transition_visitor(DEFAULT_HEADING_TOLERANCE).unwrap();
        assert_eq!(visitor.arms(), 8);
        assert_eq!(visitor.combinations(), 15);
        assert!(sink.records_named("HANDLER_UNREACHABLE").is_empty());
    }

    #[test]
    fn test_rule_order() {
        let visitor = transition_visitor(DEFAULT_HEADING_TOLERANCE).unwrap();
        // off + turn_on beats off + _
        assert_eq!(visitor.winner(&[0, 0]), Some(0));
        assert_eq!(visitor.winner(&[0, 3]), Some(1));
        // turn_off and turn_on while on
        assert_eq!(visitor.winner(&[1, 1]), Some(2));
        assert_eq!(visitor.winner(&[2, 0]), Some(3));
        assert_eq!(visitor.winner(&[2, 4]), Some(7));
    }

    // =========================================================================
    // RULES
    // =========================================================================

    #[test]
    fn test_off_absorbs_everything_but_turn_on() {
        assert_eq!(transition(&off(), &Event::from(TurnOn)).unwrap(), idle());
        for event in [
            Event::from(TurnOff),
            Event::start_turning(5.0),
            Event::reset("x"),
            Event::heading_changed(3.0),
        ] {
            assert_eq!(transition(&off(), &event).unwrap(), off());
        }
    }

    #[test]
    fn test_turn_off_from_any_on_state() {
        assert_eq!(transition(&idle(), &Event::from(TurnOff)).unwrap(), off());
        assert_eq!(
            transition(&State::turning(10.0), &Event::from(TurnOff)).unwrap(),
            off()
        );
    }

    #[test]
    fn test_turn_on_while_on_is_ignored() {
        assert_eq!(transition(&idle(), &Event::from(TurnOn)).unwrap(), idle());
        assert_eq!(
            transition(&State::turning(10.0), &Event::from(TurnOn)).unwrap(),
            State::turning(10.0)
        );
    }

    #[test]
    fn test_reset_returns_to_idle() {
        assert_eq!(
            transition(&State::turning(10.0), &Event::reset("abort")).unwrap(),
            idle()
        );
        assert_eq!(transition(&idle(), &Event::reset("noop")).unwrap(), idle());
    }

    #[test]
    fn test_start_turning_retargets() {
        assert_eq!(
            transition(&idle(), &Event::start_turning(42.0)).unwrap(),
            State::turning(42.0)
        );
        assert_eq!(
            transition(&State::turning(42.0), &Event::start_turning(90.0)).unwrap(),
            State::turning(90.0)
        );
    }

    #[test]
    fn test_heading_convergence() {
        let turning = State::turning(42.0);
        assert_eq!(transition(&turning, &Event::heading_changed(42.05)).unwrap(), idle());
        assert_eq!(
            transition(&turning, &Event::heading_changed(10.0)).unwrap(),
            turning
        );
        assert_eq!(transition(&idle(), &Event::heading_changed(10.0)).unwrap(), idle());
    }

    #[test]
    fn test_custom_tolerance() {
        let visitor = transition_visitor(5.0).unwrap();
        let turning = State::turning(42.0);
        let event = Event::heading_changed(45.0);
        assert_eq!(visitor.dispatch((&turning, &event)).unwrap(), idle());
    }

    #[test]
    fn test_heading_reached() {
        assert!(heading_reached(42.0, 42.05, 0.1));
        assert!(heading_reached(42.0, 41.95, 0.1));
        assert!(!heading_reached(42.0, 42.2, 0.1));
        assert!(!heading_reached(0.0, 0.1, 0.1));
    }
}
