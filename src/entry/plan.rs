use clap::ArgMatches;

use crate::app::{ReplayPlan, run_record, run_replay};
use crate::args::{CliArgs, Command};
use crate::config::{load_config, player_config, recorder_config};
use crate::error::AppResult;
use crate::record::RecorderConfig;

pub(super) enum RunPlan {
    Record(RecorderConfig),
    Replay(ReplayPlan),
}

/// Resolves the subcommand and merges it with the config file.
pub(super) fn build_plan(args: CliArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    let config = load_config(args.config.as_deref())?.unwrap_or_default();
    let sub_matches = matches.subcommand().map_or(matches, |(_, sub)| sub);

    match args.command {
        Command::Record(record) => Ok(RunPlan::Record(recorder_config(
            &record,
            sub_matches,
            config.recorder.as_ref(),
        )?)),
        Command::Replay(replay) => {
            let player = player_config(&replay, sub_matches, config.player.as_ref())?;
            Ok(RunPlan::Replay(ReplayPlan {
                config: player,
                log: replay.log,
                video: replay.video,
                seek: replay.seek,
                only: replay.only,
            }))
        }
    }
}

pub(super) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Record(config) => run_record(config).await,
        RunPlan::Replay(plan) => run_replay(plan).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, FromArgMatches};
    use tempfile::tempdir;

    use super::{RunPlan, build_plan};
    use crate::args::CliArgs;
    use crate::error::{AppError, AppResult};

    #[test]
    fn replay_plan_merges_explicit_config_file() -> AppResult<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "[player]\nloop = true\nspeed = 2.0\n")?;
        let config_arg = config_path.to_string_lossy().into_owned();

        let matches = CliArgs::command().try_get_matches_from([
            "reprise",
            "--config",
            config_arg.as_str(),
            "replay",
            "log.json",
            "--speed",
            "3",
        ])?;
        let args = CliArgs::from_arg_matches(&matches)?;
        match build_plan(args, &matches)? {
            RunPlan::Replay(plan) => {
                if !plan.config.loop_playback() {
                    return Err(AppError::validation("Config loop flag must apply"));
                }
                if plan.config.speed().to_bits() != 3.0_f64.to_bits() {
                    return Err(AppError::validation("CLI speed must win over config"));
                }
                Ok(())
            }
            RunPlan::Record(_) => Err(AppError::validation("Expected a replay plan")),
        }
    }
}
