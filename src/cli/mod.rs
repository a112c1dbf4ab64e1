//! CLI module for helmsman
//!
//! Provides command-line interface for:
//! - run: replay events through the heading controller
//! - demo: scripted turning scenario
//! - layout: variant size report
//! - measure: binary payload measure

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    demo, layout, layout_report, load_config, measure, measure_record, replay, replay_events,
    run, run_command, run_demo, step_record, DEMO_SCRIPT,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_lines, write_json, write_json_to};
