use std::path::Path;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::{ActionKind, ActionRecord};
use crate::error::{AppError, AppResult, ReplayError};

use super::config::PlayerConfig;
use super::events::{EventHub, PlayerEvent};
use super::loader::{LoadedLog, load_action_log};
use super::scheduler::{PlaybackSnapshot, Scheduler};

const COMMAND_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug)]
enum PlayerCommand {
    Load(LoadedLog),
    Play,
    Pause,
    Stop,
    Seek(u64),
    SetSpeed(f64),
    Snapshot,
}

#[derive(Debug)]
struct PlayerRequest {
    command: PlayerCommand,
    reply: oneshot::Sender<PlaybackSnapshot>,
}

/// Handle to the player task.
///
/// Every method is a request to the task that owns the timeline; the reply
/// is the state right after the command was applied.
#[derive(Debug)]
pub struct Player {
    commands: mpsc::Sender<PlayerRequest>,
    hub: EventHub,
    task: JoinHandle<()>,
}

impl Player {
    /// Spawns the player task on the current runtime.
    #[must_use]
    pub fn spawn(config: &PlayerConfig) -> Self {
        let hub = EventHub::new(config.event_capacity());
        let (commands, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let task = tokio::spawn(run_player(Scheduler::new(config), rx, hub.clone()));
        Self {
            commands,
            hub,
            task,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.hub.subscribe()
    }

    /// Receiver for the `action:<kind>` notification of one action kind.
    #[must_use]
    pub fn subscribe_kind(&self, kind: ActionKind) -> broadcast::Receiver<ActionRecord> {
        self.hub.subscribe_kind(kind)
    }

    /// Loads an action log from disk, replacing the current timeline.
    ///
    /// # Errors
    ///
    /// Returns an error when the log cannot be read or parsed, or the player
    /// task has exited.
    pub async fn load(&self, path: &Path) -> AppResult<PlaybackSnapshot> {
        let loaded = load_action_log(path).await?;
        self.load_log(loaded).await
    }

    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn load_log(&self, loaded: LoadedLog) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::Load(loaded)).await
    }

    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn play(&self) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::Play).await
    }

    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn pause(&self) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::Pause).await
    }

    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn stop(&self) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::Stop).await
    }

    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn seek_to(&self, timestamp: u64) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::Seek(timestamp)).await
    }

    /// Non-positive or non-finite speeds are ignored and the unchanged
    /// state is returned.
    ///
    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn set_playback_speed(&self, speed: f64) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::SetSpeed(speed)).await
    }

    /// # Errors
    ///
    /// Returns an error when the player task has exited.
    pub async fn snapshot(&self) -> AppResult<PlaybackSnapshot> {
        self.request(PlayerCommand::Snapshot).await
    }

    /// Closes the command channel and waits for the task to finish.
    ///
    /// # Errors
    ///
    /// Returns an error when the player task panicked.
    pub async fn shutdown(self) -> AppResult<()> {
        let Self { commands, task, .. } = self;
        drop(commands);
        task.await?;
        Ok(())
    }

    async fn request(&self, command: PlayerCommand) -> AppResult<PlaybackSnapshot> {
        let (reply, response) = oneshot::channel();
        if self
            .commands
            .send(PlayerRequest { command, reply })
            .await
            .is_err()
        {
            return Err(AppError::replay(ReplayError::PlayerClosed));
        }
        response
            .await
            .or(Err(AppError::replay(ReplayError::PlayerClosed)))
    }
}

async fn run_player(
    mut scheduler: Scheduler,
    mut commands: mpsc::Receiver<PlayerRequest>,
    hub: EventHub,
) {
    loop {
        let armed = scheduler.next_deadline();
        let epoch = scheduler.epoch();

        tokio::select! {
            biased;
            request = commands.recv() => {
                let Some(PlayerRequest { command, reply }) = request else {
                    break;
                };
                let now = Instant::now();
                hub.publish_all(scheduler.flush_due(now));
                hub.publish_all(apply_command(&mut scheduler, command, now));
                drop(reply.send(scheduler.snapshot(now)));
            }
            () = wait_until(armed) => {
                hub.publish_all(scheduler.fire_due(Instant::now(), epoch));
            }
        }
    }
    tracing::debug!("Player command channel closed");
}

fn apply_command(
    scheduler: &mut Scheduler,
    command: PlayerCommand,
    now: Instant,
) -> Vec<PlayerEvent> {
    match command {
        PlayerCommand::Load(loaded) => scheduler.load(loaded),
        PlayerCommand::Play => scheduler.play(now),
        PlayerCommand::Pause => scheduler.pause(now),
        PlayerCommand::Stop => scheduler.stop(),
        PlayerCommand::Seek(timestamp) => scheduler.seek_to(now, timestamp),
        PlayerCommand::SetSpeed(speed) => scheduler.set_playback_speed(now, speed),
        PlayerCommand::Snapshot => Vec::new(),
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
