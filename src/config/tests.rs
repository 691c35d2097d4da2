use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::types::{ConfigFile, PlayerSection, RecorderSection};
use super::{load_config_file, player_config, recorder_config};
use crate::args::{CliArgs, Command, RecordArgs, ReplayArgs};
use crate::error::{AppError, AppResult, ConfigError};

fn parse(argv: &[&str]) -> AppResult<(CliArgs, ArgMatches)> {
    let matches = CliArgs::command().try_get_matches_from(argv)?;
    let args = CliArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn replay_args(argv: &[&str]) -> AppResult<(ReplayArgs, ArgMatches)> {
    let (args, matches) = parse(argv)?;
    let sub = matches
        .subcommand_matches("replay")
        .cloned()
        .ok_or_else(|| AppError::validation("Missing replay matches"))?;
    match args.command {
        Command::Replay(replay) => Ok((replay, sub)),
        Command::Record(_) => Err(AppError::validation("Expected replay subcommand")),
    }
}

fn record_args(argv: &[&str]) -> AppResult<(RecordArgs, ArgMatches)> {
    let (args, matches) = parse(argv)?;
    let sub = matches
        .subcommand_matches("record")
        .cloned()
        .ok_or_else(|| AppError::validation("Missing record matches"))?;
    match args.command {
        Command::Record(record) => Ok((record, sub)),
        Command::Replay(_) => Err(AppError::validation("Expected record subcommand")),
    }
}

#[test]
fn parse_toml_config_sections() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("reprise.toml");
    let content = r#"
[recorder]
output_dir = "sessions"
immediate_write = true

[player]
speed = 0.5
loop = true
event_capacity = 32
"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    let recorder = config
        .recorder
        .ok_or_else(|| AppError::validation("Expected recorder section"))?;
    if recorder.output_dir.as_deref() != Some("sessions") || recorder.immediate_write != Some(true)
    {
        return Err(AppError::validation("Unexpected recorder section"));
    }
    let player = config
        .player
        .ok_or_else(|| AppError::validation("Expected player section"))?;
    if player.speed.map(f64::to_bits) != Some(0.5_f64.to_bits())
        || player.loop_playback != Some(true)
        || player.event_capacity != Some(32)
    {
        return Err(AppError::validation("Unexpected player section"));
    }
    Ok(())
}

#[test]
fn parse_json_config_sections() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("reprise.json");
    std::fs::write(
        &path,
        r#"{"player": {"debug": true, "speed": 3}, "recorder": {"file_name": "fixed.json"}}"#,
    )?;

    let config = load_config_file(&path)?;
    let player = config.player.unwrap_or_default();
    if player.debug_catch_up != Some(true) || player.speed.map(f64::to_bits) != Some(3.0_f64.to_bits())
    {
        return Err(AppError::validation("Unexpected player section"));
    }
    let recorder = config.recorder.unwrap_or_default();
    if recorder.file_name.as_deref() != Some("fixed.json") {
        return Err(AppError::validation("Unexpected recorder section"));
    }
    Ok(())
}

#[test]
fn rejects_unknown_extensions_and_bad_syntax() -> AppResult<()> {
    let dir = tempdir()?;
    let yaml = dir.path().join("reprise.yaml");
    std::fs::write(&yaml, "player: {}")?;
    if !matches!(
        load_config_file(&yaml),
        Err(AppError::Config(ConfigError::UnsupportedExtension { .. }))
    ) {
        return Err(AppError::validation("Expected UnsupportedExtension"));
    }

    let toml = dir.path().join("broken.toml");
    std::fs::write(&toml, "[player\nspeed = ")?;
    if !matches!(
        load_config_file(&toml),
        Err(AppError::Config(ConfigError::ParseToml { .. }))
    ) {
        return Err(AppError::validation("Expected ParseToml"));
    }
    Ok(())
}

#[test]
fn config_fills_values_not_given_on_cli() -> AppResult<()> {
    let (args, matches) = replay_args(&["reprise", "replay", "log.json"])?;
    let section = PlayerSection {
        speed: Some(4.0),
        loop_playback: Some(true),
        debug_catch_up: Some(true),
        event_capacity: Some(16),
    };
    let config = player_config(&args, &matches, Some(&section))?;
    if config.speed().to_bits() != 4.0_f64.to_bits()
        || !config.loop_playback()
        || !config.debug_catch_up()
        || config.event_capacity() != 16
    {
        return Err(AppError::validation("Config values were not applied"));
    }
    Ok(())
}

#[test]
fn cli_values_override_config() -> AppResult<()> {
    let (args, matches) = replay_args(&["reprise", "replay", "log.json", "--speed", "1.5"])?;
    let section = PlayerSection {
        speed: Some(4.0),
        ..PlayerSection::default()
    };
    let config = player_config(&args, &matches, Some(&section))?;
    if config.speed().to_bits() != 1.5_f64.to_bits() {
        return Err(AppError::validation("CLI speed must win"));
    }

    let (args, matches) = record_args(&[
        "reprise",
        "record",
        "--output-dir",
        "from-cli",
        "--file-name",
        "cli.json",
    ])?;
    let section = RecorderSection {
        output_dir: Some("from-config".to_owned()),
        file_name: Some("config.json".to_owned()),
        immediate_write: Some(true),
        event_capacity: None,
    };
    let config = recorder_config(&args, &matches, Some(&section))?;
    if config.session_path() != std::path::Path::new("from-cli").join("cli.json") {
        return Err(AppError::validation("CLI output path must win"));
    }
    if !config.immediate_write() {
        return Err(AppError::validation("Config immediate_write must apply"));
    }
    Ok(())
}

#[test]
fn invalid_config_values_name_the_field() -> AppResult<()> {
    let (args, matches) = replay_args(&["reprise", "replay", "log.json"])?;
    let section = PlayerSection {
        speed: Some(-2.0),
        ..PlayerSection::default()
    };
    match player_config(&args, &matches, Some(&section)) {
        Err(AppError::Config(ConfigError::InvalidField { field, .. })) if field == "player.speed" => {}
        Err(other) => return Err(AppError::validation(format!("Unexpected error: {}", other))),
        Ok(_) => return Err(AppError::validation("Expected invalid speed")),
    }

    let (args, matches) = record_args(&["reprise", "record"])?;
    let section = RecorderSection {
        file_name: Some(" ".to_owned()),
        ..RecorderSection::default()
    };
    match recorder_config(&args, &matches, Some(&section)) {
        Err(AppError::Config(ConfigError::InvalidField { field, .. }))
            if field == "recorder.file_name" =>
        {
            Ok(())
        }
        Err(other) => Err(AppError::validation(format!("Unexpected error: {}", other))),
        Ok(_) => Err(AppError::validation("Expected invalid file name")),
    }
}

#[test]
fn missing_config_file_is_fine() -> AppResult<()> {
    let empty = ConfigFile::default();
    if empty.player.is_some() || empty.recorder.is_some() {
        return Err(AppError::validation("Default config must be empty"));
    }
    let (args, matches) = replay_args(&["reprise", "replay", "log.json"])?;
    let config = player_config(&args, &matches, None)?;
    if config.speed().to_bits() != 1.0_f64.to_bits() || config.loop_playback() {
        return Err(AppError::validation("Expected player defaults"));
    }
    Ok(())
}
