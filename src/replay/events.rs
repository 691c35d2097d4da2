use std::collections::BTreeMap;

use tokio::sync::broadcast;

use crate::domain::{ActionKind, ActionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerErrorKind {
    MalformedAction,
}

/// Notifications published by the player task.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Loaded {
        len: usize,
        duration_ms: u64,
        rejected: usize,
    },
    Play {
        timestamp: u64,
    },
    Pause {
        timestamp: u64,
    },
    Stop,
    Seek {
        timestamp: u64,
    },
    SpeedChanged {
        speed: f64,
    },
    Looped,
    Action(ActionRecord),
    Error {
        kind: PlayerErrorKind,
        message: String,
    },
}

impl PlayerEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            PlayerEvent::Loaded { .. } => "loaded",
            PlayerEvent::Play { .. } => "play",
            PlayerEvent::Pause { .. } => "pause",
            PlayerEvent::Stop => "stop",
            PlayerEvent::Seek { .. } => "seek",
            PlayerEvent::SpeedChanged { .. } => "speed",
            PlayerEvent::Looped => "looped",
            PlayerEvent::Action(_) => "action",
            PlayerEvent::Error { .. } => "error",
        }
    }
}

/// Fan-out for player events: one channel for everything plus one
/// record channel per action kind.
#[derive(Debug, Clone)]
pub struct EventHub {
    all: broadcast::Sender<PlayerEvent>,
    by_kind: BTreeMap<ActionKind, broadcast::Sender<ActionRecord>>,
}

impl EventHub {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (all, _) = broadcast::channel(capacity);
        let by_kind = ActionKind::ALL
            .iter()
            .map(|kind| (*kind, broadcast::channel(capacity).0))
            .collect();
        Self { all, by_kind }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.all.subscribe()
    }

    #[must_use]
    pub fn subscribe_kind(&self, kind: ActionKind) -> broadcast::Receiver<ActionRecord> {
        self.by_kind
            .get(&kind)
            .map_or_else(|| broadcast::channel(1).1, broadcast::Sender::subscribe)
    }

    pub fn publish(&self, event: PlayerEvent) {
        if let PlayerEvent::Action(record) = &event
            && let Some(sender) = self.by_kind.get(&record.kind)
        {
            tracing::trace!("Publishing {} at {}ms", record.kind.topic(), record.timestamp);
            drop(sender.send(record.clone()));
        }
        drop(self.all.send(event));
    }

    pub fn publish_all(&self, events: Vec<PlayerEvent>) {
        for event in events {
            tracing::trace!("Player event: {}", event.name());
            self.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventHub, PlayerEvent};
    use crate::domain::{ActionKind, ActionRecord};
    use crate::error::{AppError, AppResult};

    #[test]
    fn actions_reach_generic_and_kind_channels() -> AppResult<()> {
        let hub = EventHub::new(8);
        let mut all = hub.subscribe();
        let mut clicks = hub.subscribe_kind(ActionKind::Click);
        let mut inputs = hub.subscribe_kind(ActionKind::Input);

        let click = ActionRecord::bare(ActionKind::Click, 0);
        hub.publish_all(vec![
            PlayerEvent::Play { timestamp: 0 },
            PlayerEvent::Action(click.clone()),
        ]);

        if all.try_recv().ok() != Some(PlayerEvent::Play { timestamp: 0 }) {
            return Err(AppError::validation("Expected play first"));
        }
        if all.try_recv().ok() != Some(PlayerEvent::Action(click.clone())) {
            return Err(AppError::validation("Expected generic action event"));
        }
        if clicks.try_recv().ok() != Some(click) {
            return Err(AppError::validation("Expected click on its kind channel"));
        }
        if inputs.try_recv().is_ok() {
            return Err(AppError::validation("Input channel must stay empty"));
        }
        Ok(())
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let hub = EventHub::new(1);
        hub.publish(PlayerEvent::Stop);
        hub.publish(PlayerEvent::Action(ActionRecord::bare(ActionKind::Frame, 3)));
        assert_eq!(PlayerEvent::Looped.name(), "looped");
    }
}
