//! Record side: stamping captures and persisting the action log.
pub mod clock;
pub mod collector;
pub mod config;
pub mod sink;
pub mod store;

pub use clock::RecordingClock;
pub use collector::{
    CAPTURE_CHANNEL_CAPACITY, Capture, CaptureMessage, Collector, spawn_line_capture_source,
};
pub use config::RecorderConfig;
pub use sink::{ActionSink, RecorderErrorKind, RecorderEvent, RecordingOutput};
pub use store::{FsLogStore, LogStore};
