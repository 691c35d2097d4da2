use std::path::PathBuf;

use chrono::{Datelike, Local, Timelike};

use crate::error::ValidationError;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "recordings";
/// Default capacity of the recorder event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Immutable recorder options, validated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    output_dir: PathBuf,
    file_name: Option<String>,
    immediate_write: bool,
    event_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_name: None,
            immediate_write: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl RecorderConfig {
    /// # Errors
    ///
    /// Returns an error when the file name is blank or the event capacity is zero.
    pub fn new(
        output_dir: PathBuf,
        file_name: Option<String>,
        immediate_write: bool,
        event_capacity: usize,
    ) -> Result<Self, ValidationError> {
        if file_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ValidationError::EmptyFileName);
        }
        if event_capacity == 0 {
            return Err(ValidationError::InvalidEventCapacity);
        }
        Ok(Self {
            output_dir,
            file_name,
            immediate_write,
            event_capacity,
        })
    }

    #[must_use]
    pub const fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    #[must_use]
    pub const fn immediate_write(&self) -> bool {
        self.immediate_write
    }

    #[must_use]
    pub const fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    /// Path of the log file for a session starting now.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        let file_name = self
            .file_name
            .clone()
            .unwrap_or_else(default_session_file_name);
        self.output_dir.join(file_name)
    }
}

fn default_session_file_name() -> String {
    let now = Local::now();
    format!(
        "actions-{:04}-{:02}-{:02}_{:02}-{:02}-{:02}.json",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
