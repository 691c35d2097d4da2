use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::domain::ActionRecord;
use crate::error::{AppError, AppResult, SinkError};

use super::config::RecorderConfig;
use super::store::LogStore;

/// Best-effort failure categories reported on the recorder channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderErrorKind {
    Write,
    Capture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    Started { path: PathBuf },
    Action(ActionRecord),
    Stopped { path: PathBuf, count: usize },
    Error { kind: RecorderErrorKind, message: String },
}

/// Final log of a session and where it was written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingOutput {
    pub log: Vec<ActionRecord>,
    pub path: Option<PathBuf>,
}

/// Buffers actions in arrival order and persists them.
pub struct ActionSink {
    config: RecorderConfig,
    store: Arc<dyn LogStore>,
    log: Vec<ActionRecord>,
    session_path: Option<PathBuf>,
    last_output: Option<RecordingOutput>,
    events: broadcast::Sender<RecorderEvent>,
}

impl ActionSink {
    #[must_use]
    pub fn new(config: RecorderConfig, store: Arc<dyn LogStore>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity());
        Self {
            config,
            store,
            log: Vec::new(),
            session_path: None,
            last_output: None,
            events,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }

    pub(crate) fn report(&self, kind: RecorderErrorKind, message: String) {
        tracing::warn!("Recorder {:?} error: {}", kind, message);
        drop(self.events.send(RecorderEvent::Error { kind, message }));
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session_path.is_some()
    }

    /// Accumulated log, including every append so far.
    #[must_use]
    pub fn log(&self) -> &[ActionRecord] {
        &self.log
    }

    /// Opens a session: creates the output directory and resets the buffer.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::CreateDirectory` when the output directory cannot
    /// be created.
    pub async fn start(&mut self) -> AppResult<PathBuf> {
        if let Some(path) = self.session_path.as_ref() {
            tracing::debug!("Recording already active at {}", path.display());
            return Ok(path.clone());
        }
        self.store.ensure_dir(self.config.output_dir()).await?;
        let path = self.config.session_path();
        self.log.clear();
        self.session_path = Some(path.clone());
        tracing::info!("Recording to {}", path.display());
        drop(self.events.send(RecorderEvent::Started { path: path.clone() }));
        Ok(path)
    }

    /// Appends an action; with immediate writes enabled the durable log is
    /// rewritten too. Write failures are reported, never returned.
    pub async fn record_action(&mut self, action: ActionRecord) {
        self.log.push(action.clone());
        drop(self.events.send(RecorderEvent::Action(action.clone())));

        if !self.config.immediate_write() {
            return;
        }
        let Some(path) = self.session_path.clone() else {
            return;
        };
        if let Err(err) = self.append_durably(&path, action).await {
            self.report(RecorderErrorKind::Write, err.to_string());
        }
    }

    async fn append_durably(&self, path: &Path, action: ActionRecord) -> AppResult<()> {
        let mut entries: Vec<Value> = match self.store.read_full(path).await? {
            Some(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes).map_err(|err| {
                AppError::sink(SinkError::ParseSnapshot {
                    path: path.to_path_buf(),
                    source: err,
                })
            })?,
            Some(_) | None => Vec::new(),
        };
        let value = serde_json::to_value(action)
            .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
        entries.push(value);
        let bytes = serde_json::to_vec_pretty(&entries)
            .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
        self.store.write_full(path, &bytes).await
    }

    /// Writes the whole log as one snapshot and closes the session.
    ///
    /// Without an active session this returns the previous result.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::WriteLog` when the final snapshot cannot be
    /// written. The session then stays open so a later `stop` retries the
    /// same file, and the log stays available through [`Self::log`].
    pub async fn stop(&mut self) -> AppResult<RecordingOutput> {
        let Some(path) = self.session_path.clone() else {
            return Ok(self.last_output.clone().unwrap_or_default());
        };

        let bytes = serde_json::to_vec_pretty(&self.log)
            .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
        if let Err(err) = self.store.write_full(&path, &bytes).await {
            self.report(RecorderErrorKind::Write, err.to_string());
            return Err(err);
        }
        self.session_path = None;

        let output = RecordingOutput {
            log: self.log.clone(),
            path: Some(path.clone()),
        };
        tracing::info!(
            "Recording stopped: {} actions written to {}",
            output.log.len(),
            path.display()
        );
        drop(self.events.send(RecorderEvent::Stopped {
            path,
            count: output.log.len(),
        }));
        self.last_output = Some(output.clone());
        Ok(output)
    }
}
