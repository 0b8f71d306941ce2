//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "reactor", version, about = "Analog sensor conditioning runner")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/reactor.toml")]
    pub config: PathBuf,

    /// Emit events and logs as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); defaults to [logging] level, then info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the configured sensors and print change and zone events
    Run {
        /// Stop after this many ticks (default: until Ctrl-C, or the end of --trace)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Replay raw readings from a CSV with a single `raw` column
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
        /// Only run the sensor bound to this channel
        #[arg(long, value_name = "C")]
        channel: Option<u8>,
        /// Print tick timing stats to stderr on exit
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Print the preset table
    Presets,
    /// Parse and validate the config, then exit
    Check,
}
