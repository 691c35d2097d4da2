use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "REPRISE_LOG";

/// Installs the global subscriber. Logs go to stderr so stdout stays free
/// for replayed actions.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = std::env::var(LOG_ENV).or_else(|_| std::env::var("RUST_LOG")).ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(build_filter(directive.as_deref(), verbose))
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn build_filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    directive.map_or_else(
        || EnvFilter::new(fallback),
        |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(fallback)),
    )
}

#[cfg(test)]
mod tests {
    use super::{build_filter, init_logging};

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false, true);
        init_logging(true, true);
    }

    #[test]
    fn filter_prefers_directive_over_verbosity() {
        assert_eq!(build_filter(Some("reprise=trace"), false).to_string(), "reprise=trace");
        assert_eq!(build_filter(None, true).to_string(), "debug");
        assert_eq!(build_filter(None, false).to_string(), "info");
    }
}
