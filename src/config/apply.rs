use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{RecordArgs, ReplayArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::record::RecorderConfig;
use crate::record::config::DEFAULT_EVENT_CAPACITY as RECORDER_EVENT_CAPACITY;
use crate::replay::PlayerConfig;
use crate::replay::config::DEFAULT_EVENT_CAPACITY as PLAYER_EVENT_CAPACITY;

use super::types::{PlayerSection, RecorderSection};

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn invalid_field(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}

/// Builds the recorder options: defaults, then the `[recorder]` section,
/// then flags given on the command line.
///
/// # Errors
///
/// Returns an error when the resulting options are invalid.
pub fn recorder_config(
    args: &RecordArgs,
    matches: &ArgMatches,
    section: Option<&RecorderSection>,
) -> AppResult<RecorderConfig> {
    let mut output_dir = args.output_dir.clone();
    let mut file_name = args.file_name.clone();
    let mut immediate_write = args.immediate_write;
    let mut event_capacity = RECORDER_EVENT_CAPACITY;

    if let Some(section) = section {
        if !is_cli(matches, "output_dir")
            && let Some(dir) = section.output_dir.as_ref()
        {
            output_dir = PathBuf::from(dir);
        }
        if !is_cli(matches, "file_name")
            && let Some(name) = section.file_name.clone()
        {
            file_name = Some(name);
        }
        if !is_cli(matches, "immediate_write")
            && let Some(immediate) = section.immediate_write
        {
            immediate_write = immediate;
        }
        if let Some(capacity) = section.event_capacity {
            event_capacity = capacity;
        }
    }

    RecorderConfig::new(output_dir, file_name, immediate_write, event_capacity).map_err(|err| {
        let field = if matches!(err, ValidationError::EmptyFileName) {
            "recorder.file_name"
        } else {
            "recorder.event_capacity"
        };
        invalid_field(field, err)
    })
}

/// Builds the player options: defaults, then the `[player]` section, then
/// flags given on the command line.
///
/// # Errors
///
/// Returns an error when the resulting options are invalid.
pub fn player_config(
    args: &ReplayArgs,
    matches: &ArgMatches,
    section: Option<&PlayerSection>,
) -> AppResult<PlayerConfig> {
    let mut speed = args.speed;
    let mut loop_playback = args.loop_playback;
    let mut debug_catch_up = args.debug_catch_up;
    let mut event_capacity = PLAYER_EVENT_CAPACITY;

    if let Some(section) = section {
        if !is_cli(matches, "speed")
            && let Some(value) = section.speed
        {
            speed = value;
        }
        if !is_cli(matches, "loop_playback")
            && let Some(value) = section.loop_playback
        {
            loop_playback = value;
        }
        if !is_cli(matches, "debug_catch_up")
            && let Some(value) = section.debug_catch_up
        {
            debug_catch_up = value;
        }
        if let Some(capacity) = section.event_capacity {
            event_capacity = capacity;
        }
    }

    PlayerConfig::new(speed, loop_playback, debug_catch_up, event_capacity).map_err(|err| {
        let field = if matches!(err, ValidationError::NonPositiveSpeed { .. }) {
            "player.speed"
        } else {
            "player.event_capacity"
        };
        invalid_field(field, err)
    })
}
