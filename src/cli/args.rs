//! CLI argument definitions using clap
//!
//! Commands:
//! - helmsman run [--config <path>] [--trace] [EVENT...]
//! - helmsman demo [--trace]
//! - helmsman layout
//! - helmsman measure <LEFT> <RIGHT>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// helmsman - closed variants and multi-dispatch, driving a heading controller
#[derive(Parser, Debug)]
#[command(name = "helmsman")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay events through the heading controller
    ///
    /// Events are read one per stdin line when none are given.
    Run {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log every variant and dispatch step
        #[arg(long)]
        trace: bool,

        /// Events: turn_on, turn_off, start_turning:<deg>, reset:<reason>, heading_changed:<deg>
        events: Vec<String>,
    },

    /// Run the scripted turning scenario
    Demo {
        /// Log every variant and dispatch step
        #[arg(long)]
        trace: bool,
    },

    /// Report the in-memory size of the variant types
    Layout,

    /// Measure two payloads (text:<s> or numbers:<i,i,...>)
    Measure {
        left: String,
        right: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
