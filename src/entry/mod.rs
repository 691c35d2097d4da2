mod plan;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::CliArgs;
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_async(args, &matches));
    // Blocked stdin reads must not keep the process alive.
    runtime.shutdown_background();
    result
}

fn parse_args() -> AppResult<(CliArgs, ArgMatches)> {
    let matches = CliArgs::command().get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: CliArgs, matches: &ArgMatches) -> AppResult<()> {
    let plan = build_plan(args, matches)?;
    execute_plan(plan).await
}
