use tokio::sync::broadcast;

/// One signal fans out to every task that subscribed.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}
