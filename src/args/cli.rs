use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ActionKind;
use crate::record::config::DEFAULT_OUTPUT_DIR;
use crate::replay::config::DEFAULT_SPEED;

use super::parsers::{parse_action_kind, parse_speed};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Record captures (JSON lines on stdin) into a timestamped action log
    Record(RecordArgs),
    /// Replay an action log on its original timeline (JSON lines on stdout)
    Replay(ReplayArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RecordArgs {
    /// Directory the action log is written to
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Fixed log file name (defaults to actions-<local time>.json)
    #[arg(long = "file-name")]
    pub file_name: Option<String>,

    /// Rewrite the log file after every captured action
    #[arg(long = "immediate-write")]
    pub immediate_write: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ReplayArgs {
    /// Action log to replay
    pub log: PathBuf,

    /// Companion video recording (accepted, not played)
    pub video: Option<PathBuf>,

    /// Playback speed multiplier (e.g. 0.5, 2)
    #[arg(long = "speed", default_value_t = DEFAULT_SPEED, value_parser = parse_speed)]
    pub speed: f64,

    /// Start over from the beginning after the last action
    #[arg(long = "loop")]
    pub loop_playback: bool,

    /// Emit actions that are behind the playback position instead of skipping them
    #[arg(long = "debug")]
    pub debug_catch_up: bool,

    /// Start position in milliseconds
    #[arg(long = "seek")]
    pub seek: Option<u64>,

    /// Only print actions of this type (click, input, navigation, ...)
    #[arg(long = "only", value_parser = parse_action_kind)]
    pub only: Option<ActionKind>,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "reprise",
    version,
    about = "Record browser sessions as timestamped action logs and replay them on their original timeline."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML/JSON)
    #[arg(long = "config", global = true)]
    pub config: Option<String>,

    /// Enable debug logging (overridden by REPRISE_LOG or RUST_LOG)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}
