use std::path::Path;

use serde_json::Value;

use crate::domain::{ActionRecord, EventLog};
use crate::error::{AppError, AppResult, ReplayError};

/// An entry that could not be turned into an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedAction {
    pub index: usize,
    pub reason: String,
}

/// Result of loading a log: the sorted actions plus what was skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadedLog {
    pub log: EventLog,
    pub rejected: Vec<RejectedAction>,
}

impl LoadedLog {
    #[must_use]
    pub fn from_records(records: Vec<ActionRecord>) -> Self {
        Self {
            log: EventLog::from_unsorted(records),
            rejected: Vec::new(),
        }
    }
}

/// Reads an action log file and returns its actions sorted by timestamp.
///
/// # Errors
///
/// Returns a `ReplayError` when the file cannot be read, is not valid JSON,
/// or its top level is not an array.
pub async fn load_action_log(path: &Path) -> AppResult<LoadedLog> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        AppError::replay(ReplayError::ReadLog {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    parse_action_log(path, &bytes)
}

/// Parses a serialized action log. Malformed entries are skipped and listed
/// in [`LoadedLog::rejected`] rather than failing the whole load.
///
/// # Errors
///
/// Returns a `ReplayError` when the payload is not a JSON array.
pub fn parse_action_log(path: &Path, bytes: &[u8]) -> AppResult<LoadedLog> {
    let document: Value = serde_json::from_slice(bytes).map_err(|err| {
        AppError::replay(ReplayError::ParseLog {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let Value::Array(entries) = document else {
        return Err(AppError::replay(ReplayError::NotAnArray {
            path: path.to_path_buf(),
        }));
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ActionRecord>(entry) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(
                    "Skipping malformed action #{} in {}: {}",
                    index,
                    path.display(),
                    err
                );
                rejected.push(RejectedAction {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    let log = EventLog::from_unsorted(records);
    tracing::debug!(
        "Loaded {} actions ({} rejected) spanning {}ms from {}",
        log.len(),
        rejected.len(),
        log.duration_ms(),
        path.display()
    );
    Ok(LoadedLog { log, rejected })
}
