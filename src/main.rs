mod app;
mod args;
mod config;
mod domain;
mod entry;
mod error;
mod logger;
mod record;
mod replay;
mod shutdown;
mod shutdown_handlers;
#[cfg(test)]
mod test_support;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
