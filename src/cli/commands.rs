//! CLI command implementations
//!
//! - run: replay events through a heading controller
//! - demo: the scripted turning scenario
//! - layout: size report of the variant types
//! - measure: binary payload measure
//!
//! All commands are synchronous and single-threaded. Output is one JSON
//! object per stdout line; log records go through an installed sink.

use std::io::{self, Write};
use std::mem;
use std::path::Path;

use serde_json::{json, Value};

use crate::helm::{ControllerConfig, Event, HeadingController, Idle, State};
use crate::observability::{self, Event as LogEvent, JsonSink, Severity, SinkGuard};
use crate::payload::{combined_measure, Payload};
use crate::variant::{Discriminant, Never, Variant};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_lines, write_json, write_json_to};

/// Events of the scripted demo, applied to an idle controller.
pub const DEMO_SCRIPT: [&str; 3] = ["start_turning:42", "heading_changed:101", "heading_changed:42"];

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a specific command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run {
            config,
            trace,
            events,
        } => replay(config.as_deref(), trace, &events),
        Command::Demo { trace } => demo(trace),
        Command::Layout => layout(),
        Command::Measure { left, right } => measure(&left, &right),
    }
}

/// Load the configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> CliResult<ControllerConfig> {
    let config = match path {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };

    if observability::enabled(Severity::Info) {
        let tolerance = config.heading_tolerance.to_string();
        let source = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());
        observability::emit(
            Severity::Info,
            LogEvent::ConfigLoaded,
            &[
                ("heading_tolerance", &tolerance),
                ("initial_state", &config.initial_state),
                ("source", &source),
            ],
        );
    }

    Ok(config)
}

fn trace_sink(trace: bool) -> Option<SinkGuard> {
    trace.then(|| observability::install_sink(JsonSink::new(Severity::Trace)))
}

/// Replay events from the arguments, or from stdin when there are none.
pub fn replay(config_path: Option<&Path>, trace: bool, events: &[String]) -> CliResult<()> {
    let _guard = trace_sink(trace);
    let config = load_config(config_path)?;
    let _config_guard = if config.trace && !trace {
        trace_sink(true)
    } else {
        None
    };

    let mut controller = HeadingController::new(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if events.is_empty() {
        let stdin = io::stdin();
        replay_events(&mut controller, read_lines(stdin.lock()), &mut out)
    } else {
        replay_events(&mut controller, events.iter().cloned().map(Ok), &mut out)
    }
}

/// Apply each event line and write one JSON record per step.
///
/// Stops at the first malformed line or failed transition.
pub fn replay_events<W: Write>(
    controller: &mut HeadingController,
    lines: impl IntoIterator<Item = CliResult<String>>,
    out: &mut W,
) -> CliResult<()> {
    for line in lines {
        let line = line?;
        let event: Event = line.parse()?;
        let state = controller.apply(&event)?;
        write_json_to(out, &step_record(&event, state))?;
    }
    Ok(())
}

/// JSON record of one applied event.
pub fn step_record(event: &Event, state: &State) -> Value {
    json!({
        "event": event.event_name(),
        "state": state.to_string(),
        "discriminant": state.discriminant(),
    })
}

/// Scripted scenario: start idle, turn to 42, overshoot, converge.
pub fn demo(trace: bool) -> CliResult<()> {
    let threshold = if trace { Severity::Trace } else { Severity::Info };
    let _guard = observability::install_sink(JsonSink::new(threshold));

    let final_state = run_demo()?;

    if !final_state.holds::<Idle>() {
        return Err(CliError::dispatch_failed(format!(
            "demo ended in {} instead of idle",
            final_state
        )));
    }
    Ok(())
}

/// Run [`DEMO_SCRIPT`] and return the final state.
pub fn run_demo() -> CliResult<State> {
    let mut controller = HeadingController::with_defaults()?;
    controller.reset_to(State::from(Idle));

    let initial = controller.state().to_string();
    observability::emit(Severity::Info, LogEvent::DemoStart, &[("state", &initial)]);

    for text in DEMO_SCRIPT {
        let event: Event = text.parse()?;
        controller.apply(&event)?;
    }

    let final_state = *controller.state();
    let rendered = final_state.to_string();
    let steps = controller.transitions_applied().to_string();
    observability::emit(
        Severity::Info,
        LogEvent::DemoComplete,
        &[("state", &rendered), ("steps", &steps)],
    );

    Ok(final_state)
}

/// In-memory sizes of the variant types, in bytes.
pub fn layout_report() -> Vec<(&'static str, usize)> {
    vec![
        ("Discriminant", mem::size_of::<Discriminant>()),
        ("Never", mem::size_of::<Never>()),
        ("State", mem::size_of::<State>()),
        ("Event", mem::size_of::<Event>()),
        ("Payload", mem::size_of::<Payload>()),
    ]
}

/// Log the size of every variant type.
pub fn layout() -> CliResult<()> {
    for (name, size) in layout_report() {
        let size = size.to_string();
        observability::log_event(LogEvent::LayoutReport, &[("bytes", &size), ("type", name)]);
    }
    Ok(())
}

/// JSON record of the binary measure of two payload texts.
pub fn measure_record(left: &str, right: &str) -> CliResult<Value> {
    let left: Payload = left.parse()?;
    let right: Payload = right.parse()?;
    let measure = combined_measure(&left, &right)?;

    Ok(json!({
        "left": left.to_string(),
        "right": right.to_string(),
        "measure": measure,
    }))
}

/// Measure two payloads and print the result.
pub fn measure(left: &str, right: &str) -> CliResult<()> {
    write_json(&measure_record(left, right)?)
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::observability::MemorySink;
    use std::fs;
    use tempfile::TempDir;

    fn lines(items: &[&str]) -> Vec<CliResult<String>> {
        items.iter().map(|s| Ok(s.to_string())).collect()
    }

    fn output_records(out: Vec<u8>) -> Vec<Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    // =========================================================================
    // RUN
    // =========================================================================

    #[test]
    fn test_replay_writes_one_record_per_event() {
        let mut controller = HeadingController::with_defaults().unwrap();
        let mut out = Vec::new();

        replay_events(
            &mut controller,
            lines(&["turn_on", "start_turning:42", "heading_changed:42.05"]),
            &mut out,
        )
        .unwrap();

        let records = output_records(out);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["event"], "turn_on");
        assert_eq!(records[0]["state"], "variant[1]: idle{}");
        assert_eq!(records[1]["state"], "variant[2]: turning{42}");
        assert_eq!(records[1]["discriminant"], 2);
        assert_eq!(records[2]["state"], "variant[1]: idle{}");
    }

    #[test]
    fn test_replay_stops_at_malformed_event() {
        let mut controller = HeadingController::with_defaults().unwrap();
        let mut out = Vec::new();

        let err = replay_events(
            &mut controller,
            lines(&["turn_on", "fly", "turn_off"]),
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.code(), &CliErrorCode::InvalidInput);
        assert_eq!(output_records(out).len(), 1);
        assert_eq!(controller.state(), &State::from(Idle));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("helm.json");
        fs::write(&path, json!({ "initial_state": "idle" }).to_string()).unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.initial_state, "idle");
        assert_eq!(config.heading_tolerance, 0.1);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("helm.json");
        fs::write(&path, json!({ "heading_tolerance": -1 }).to_string()).unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);

        let err = load_config(Some(temp_dir.path().join("missing.json").as_path())).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    // =========================================================================
    // DEMO
    // =========================================================================

    #[test]
    fn test_demo_converges_to_idle() {
        let sink = MemorySink::new(Severity::Info);
        let _guard = observability::install_sink(sink.clone());

        let final_state = run_demo().unwrap();
        assert_eq!(final_state, State::from(Idle));

        let transitions = sink.records_named("TRANSITION_APPLIED");
        let states: Vec<&str> = transitions
            .iter()
            .filter_map(|record| record.field("to"))
            .collect();
        assert_eq!(
            states,
            vec![
                "variant[2]: turning{42}",
                "variant[2]: turning{42}",
                "variant[1]: idle{}"
            ]
        );
        assert_eq!(sink.records_named("DEMO_START").len(), 1);
        assert_eq!(
            sink.records_named("DEMO_COMPLETE")[0].field("steps"),
            Some("3")
        );
    }

    // =========================================================================
    // LAYOUT & MEASURE
    // =========================================================================

    #[test]
    fn test_layout_report() {
        let report = layout_report();
        assert_eq!(report.len(), 5);
        assert!(report.contains(&("Discriminant", 1)));
        assert!(report.contains(&("Never", 0)));
    }

    #[test]
    fn test_measure_record() {
        let record = measure_record("text:Hello", "numbers:1,2,3").unwrap();
        assert_eq!(record["measure"], 6);
        assert_eq!(record["left"], "variant[0]: Hello");
        assert_eq!(record["right"], "variant[1]: [1, 2, 3]");
    }

    #[test]
    fn test_measure_rejects_unknown_payload() {
        let err = measure_record("blob:1", "text:a").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);
    }
}
