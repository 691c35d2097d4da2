use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{ActionKind, ActionRecord};
use crate::error::{AppError, AppResult, ValidationError};
use crate::shutdown::ShutdownSender;

use super::clock::RecordingClock;
use super::sink::{ActionSink, RecorderErrorKind, RecordingOutput};

/// Buffer size for the capture channel between a source and the collector.
pub const CAPTURE_CHANNEL_CAPACITY: usize = 256;

/// A raw capture from the page, before it is stamped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Capture {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Capture {
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            payload: Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }
}

pub type CaptureMessage = Result<Capture, ValidationError>;

/// Stamps captures with the recording clock and routes them to the sink.
pub struct Collector {
    clock: RecordingClock,
    sink: ActionSink,
    last_stamp: u64,
}

impl Collector {
    #[must_use]
    pub const fn new(sink: ActionSink) -> Self {
        Self {
            clock: RecordingClock::new(),
            sink,
            last_stamp: 0,
        }
    }

    #[must_use]
    pub const fn sink(&self) -> &ActionSink {
        &self.sink
    }

    /// Opens a session and anchors the clock. Starting an active session
    /// keeps the running clock.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink cannot create its output directory.
    pub async fn start(&mut self) -> AppResult<PathBuf> {
        let resumed = self.sink.is_active() && self.clock.is_started();
        let path = self.sink.start().await?;
        if !resumed {
            self.clock.start();
            self.last_stamp = 0;
        }
        Ok(path)
    }

    /// Stamps and records one capture. Stamps never go backwards.
    pub async fn capture(&mut self, capture: Capture) -> ActionRecord {
        let stamp = self.clock.elapsed().max(self.last_stamp);
        self.last_stamp = stamp;

        let mut payload = capture.payload;
        payload.remove("type");
        payload.remove("timestamp");
        let record = ActionRecord::new(capture.kind, stamp, payload);
        self.sink.record_action(record.clone()).await;
        record
    }

    /// # Errors
    ///
    /// Returns an error when the final log snapshot cannot be written.
    pub async fn stop(&mut self) -> AppResult<RecordingOutput> {
        self.sink.stop().await
    }

    /// Records until the capture source closes or shutdown is signalled.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot start or the final write fails.
    pub async fn run(
        mut self,
        mut captures: mpsc::Receiver<CaptureMessage>,
        shutdown_tx: &ShutdownSender,
    ) -> AppResult<RecordingOutput> {
        let mut shutdown_rx = shutdown_tx.subscribe();
        self.start().await?;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Shutdown received, stopping recording");
                    break;
                }
                message = captures.recv() => match message {
                    Some(Ok(capture)) => {
                        let record = self.capture(capture).await;
                        tracing::trace!("Captured {} at {}ms", record.kind, record.timestamp);
                    }
                    Some(Err(err)) => {
                        self.sink.report(RecorderErrorKind::Capture, err.to_string());
                    }
                    None => break,
                },
            }
        }

        self.stop().await
    }
}

/// Reads one JSON capture per line and forwards it to the collector.
///
/// Blank lines are ignored; malformed lines are forwarded as errors so the
/// collector can report them. Resolves to the number of lines read.
pub fn spawn_line_capture_source<R>(
    reader: R,
    tx: mpsc::Sender<CaptureMessage>,
) -> JoinHandle<AppResult<usize>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut line_no: usize = 0;
        while let Some(line) = lines.next_line().await? {
            line_no = line_no.saturating_add(1);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let message = serde_json::from_str::<Capture>(trimmed).map_err(|err| {
                ValidationError::InvalidCapture {
                    line: line_no,
                    source: err,
                }
            });
            if tx.send(message).await.is_err() {
                break;
            }
        }
        Ok::<usize, AppError>(line_no)
    })
}
