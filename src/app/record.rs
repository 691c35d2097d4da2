use std::sync::Arc;

use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::{broadcast, mpsc};

use crate::error::AppResult;
use crate::record::{
    ActionSink, CAPTURE_CHANNEL_CAPACITY, Collector, FsLogStore, RecorderConfig, RecorderEvent,
    RecordingOutput, spawn_line_capture_source,
};
use crate::shutdown::{ShutdownSender, shutdown_channel};
use crate::shutdown_handlers::setup_signal_shutdown_handler;

/// Records JSON-line captures from stdin until EOF or Ctrl+C.
pub(crate) async fn run_record(config: RecorderConfig) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = record_from(config, BufReader::new(tokio::io::stdin()), &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    signal_handle.await?;

    let output = result?;
    tracing::debug!("Recording finished with {} actions", output.log.len());
    Ok(())
}

pub(crate) async fn record_from<R>(
    config: RecorderConfig,
    reader: R,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RecordingOutput>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let sink = ActionSink::new(config, Arc::new(FsLogStore));
    let reporter = tokio::spawn(report_events(sink.subscribe()));

    let (tx, rx) = mpsc::channel(CAPTURE_CHANNEL_CAPACITY);
    let source = spawn_line_capture_source(reader, tx);
    let output = Collector::new(sink).run(rx, shutdown_tx).await;

    // The source may still be blocked on input after a shutdown signal.
    source.abort();
    reporter.await?;
    output
}

async fn report_events(mut events: broadcast::Receiver<RecorderEvent>) {
    loop {
        match events.recv().await {
            Ok(RecorderEvent::Started { path }) => {
                tracing::debug!("Session started at {}", path.display());
            }
            Ok(RecorderEvent::Action(record)) => {
                tracing::debug!("Recorded {} at {}ms", record.kind, record.timestamp);
            }
            Ok(RecorderEvent::Stopped { path, count }) => {
                tracing::debug!("Stopped after {} actions ({})", count, path.display());
            }
            Ok(RecorderEvent::Error { kind, message }) => {
                tracing::debug!("Reported {:?} error: {}", kind, message);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Recorder event reporter lagged by {}", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
