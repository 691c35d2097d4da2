use std::path::PathBuf;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

use crate::domain::{ActionKind, ActionRecord};
use crate::error::AppResult;
use crate::replay::{Player, PlayerConfig, PlayerEvent};
use crate::shutdown::{ShutdownSender, shutdown_channel};
use crate::shutdown_handlers::setup_signal_shutdown_handler;

/// Everything `reprise replay` needs once config and flags are merged.
#[derive(Debug, Clone)]
pub(crate) struct ReplayPlan {
    pub(crate) config: PlayerConfig,
    pub(crate) log: PathBuf,
    pub(crate) video: Option<PathBuf>,
    pub(crate) seek: Option<u64>,
    pub(crate) only: Option<ActionKind>,
}

/// Replays a log, printing each emitted action as one JSON line on stdout.
pub(crate) async fn run_replay(plan: ReplayPlan) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let mut stdout = tokio::io::stdout();
    let result = replay_to(plan, &mut stdout, &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    signal_handle.await?;

    let emitted = result?;
    tracing::debug!("Replay finished after {} actions", emitted);
    Ok(())
}

/// Plays `plan` until the player stops or shutdown is signalled and writes
/// the selected actions to `out`. Returns the number of actions written.
pub(crate) async fn replay_to<W>(
    plan: ReplayPlan,
    out: &mut W,
    shutdown_tx: &ShutdownSender,
) -> AppResult<usize>
where
    W: AsyncWrite + Unpin,
{
    if let Some(video) = plan.video.as_ref() {
        tracing::info!("Ignoring video {}; only the action log is replayed", video.display());
    }

    let player = Player::spawn(&plan.config);
    let mut events = player.subscribe();
    let mut filtered = plan.only.map(|kind| player.subscribe_kind(kind));
    let mut shutdown_rx = shutdown_tx.subscribe();

    let loaded = player.load(&plan.log).await?;
    tracing::info!(
        "Loaded {} actions spanning {}ms from {}",
        loaded.len,
        loaded.duration_ms,
        plan.log.display()
    );
    if let Some(timestamp) = plan.seek {
        player.seek_to(timestamp).await?;
    }
    player.play().await?;

    let mut written = 0_usize;
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                player.stop().await?;
                break;
            }
            record = next_filtered(filtered.as_mut()) => {
                if let Some(record) = record {
                    write_record(out, &record).await?;
                    written = written.saturating_add(1);
                }
            }
            event = events.recv() => match event {
                Ok(PlayerEvent::Action(record)) => {
                    if filtered.is_none() {
                        write_record(out, &record).await?;
                        written = written.saturating_add(1);
                    }
                }
                Ok(PlayerEvent::Stop) => {
                    if let Some(receiver) = filtered.as_mut() {
                        while let Ok(record) = receiver.try_recv() {
                            write_record(out, &record).await?;
                            written = written.saturating_add(1);
                        }
                    }
                    break;
                }
                Ok(PlayerEvent::Error { kind, message }) => {
                    tracing::warn!("Player {:?} error: {}", kind, message);
                }
                Ok(PlayerEvent::Looped) => tracing::debug!("Replay looped"),
                Ok(other) => tracing::trace!("Player event: {}", other.name()),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Replay output lagged, {} events dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    out.flush().await?;
    player.shutdown().await?;
    Ok(written)
}

/// Next record from the per-kind channel, or never when no filter is set.
async fn next_filtered(
    receiver: Option<&mut broadcast::Receiver<ActionRecord>>,
) -> Option<ActionRecord> {
    let Some(receiver) = receiver else {
        return std::future::pending().await;
    };
    loop {
        match receiver.recv().await {
            Ok(record) => return Some(record),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Filtered output lagged, {} actions dropped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return std::future::pending().await,
        }
    }
}

async fn write_record<W>(out: &mut W, record: &ActionRecord) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    Ok(())
}
