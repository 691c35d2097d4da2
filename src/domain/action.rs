use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Kind tag carried by every captured action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Click,
    Input,
    Navigation,
    Console,
    Request,
    Response,
    Frame,
    Custom,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Click,
        ActionKind::Input,
        ActionKind::Navigation,
        ActionKind::Console,
        ActionKind::Request,
        ActionKind::Response,
        ActionKind::Frame,
        ActionKind::Custom,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::Click => "click",
            ActionKind::Input => "input",
            ActionKind::Navigation => "navigation",
            ActionKind::Console => "console",
            ActionKind::Request => "request",
            ActionKind::Response => "response",
            ActionKind::Frame => "frame",
            ActionKind::Custom => "custom",
        }
    }

    /// Topic name of the type-specific notification, e.g. `action:click`.
    #[must_use]
    pub fn topic(self) -> String {
        format!("action:{}", self.as_str())
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ValidationError::UnknownActionKind {
                value: value.to_owned(),
            })
    }
}

/// One captured user or browser event.
///
/// `timestamp` is virtual time: milliseconds since the recording started.
/// Everything besides `type` and `timestamp` is payload the timeline never
/// looks at, kept verbatim so it round-trips through the log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub timestamp: u64,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ActionRecord {
    #[must_use]
    pub const fn new(kind: ActionKind, timestamp: u64, payload: Map<String, Value>) -> Self {
        Self {
            kind,
            timestamp,
            payload,
        }
    }

    #[must_use]
    pub fn bare(kind: ActionKind, timestamp: u64) -> Self {
        Self::new(kind, timestamp, Map::new())
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }
}

/// Immutable, timestamp-sorted action sequence handed to the player.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Arc<[ActionRecord]>,
}

impl EventLog {
    /// Builds a log from records in any order; sorting is stable so equal
    /// timestamps keep their source order.
    #[must_use]
    pub fn from_unsorted(mut records: Vec<ActionRecord>) -> Self {
        records.sort_by_key(|record| record.timestamp);
        Self {
            records: records.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActionRecord> {
        self.records.get(index)
    }

    #[must_use]
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Timestamp of the last entry, 0 for an empty log.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.records.last().map_or(0, |record| record.timestamp)
    }

    /// First index whose timestamp is at or after `timestamp`.
    #[must_use]
    pub fn first_index_at_or_after(&self, timestamp: u64) -> usize {
        self.records
            .partition_point(|record| record.timestamp < timestamp)
    }
}
