use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read action log '{path}': {source}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse action log '{path}': {source}")]
    ParseLog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Action log '{path}' must contain a JSON array of actions.")]
    NotAnArray { path: PathBuf },
    #[error("Player task is no longer running.")]
    PlayerClosed,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
