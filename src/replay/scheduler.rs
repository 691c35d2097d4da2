//! Timeline scheduling for the player.
//!
//! The scheduler is pure: every transition takes the current instant and
//! returns the events it produced. Pending emissions sit in a min-heap
//! ordered by `(deadline, index)` and tagged with the epoch they were armed
//! in. Any transition that invalidates them bumps the epoch and clears the
//! heap before computing new state, so a timer armed for an older epoch
//! can never emit.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tokio::time::Instant;

use crate::domain::EventLog;

use super::clock::{PlaybackClock, PlaybackStatus};
use super::config::PlayerConfig;
use super::events::{PlayerErrorKind, PlayerEvent};
use super::loader::LoadedLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEmission {
    deadline: Instant,
    index: usize,
    epoch: u64,
}

impl Ord for PendingEmission {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for PendingEmission {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Observable player state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub current_timestamp: u64,
    pub action_index: usize,
    pub speed: f64,
    pub duration_ms: u64,
    pub len: usize,
}

#[derive(Debug)]
pub struct Scheduler {
    log: EventLog,
    clock: PlaybackClock,
    cursor: usize,
    pending: BinaryHeap<Reverse<PendingEmission>>,
    epoch: u64,
    loop_playback: bool,
    debug_catch_up: bool,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            log: EventLog::default(),
            clock: PlaybackClock::new(config.speed()),
            cursor: 0,
            pending: BinaryHeap::new(),
            epoch: 0,
            loop_playback: config.loop_playback(),
            debug_catch_up: config.debug_catch_up(),
        }
    }

    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        self.clock.status()
    }

    #[must_use]
    pub const fn action_index(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_timestamp(&self, now: Instant) -> u64 {
        self.clock.current_timestamp(now)
    }

    /// Earliest armed deadline, if anything is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.peek().map(|Reverse(entry)| entry.deadline)
    }

    #[must_use]
    pub fn snapshot(&self, now: Instant) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.clock.status(),
            current_timestamp: self.clock.current_timestamp(now),
            action_index: self.cursor,
            speed: self.clock.speed(),
            duration_ms: self.log.duration_ms(),
            len: self.log.len(),
        }
    }

    /// Replaces the log. Any playback in progress is stopped first.
    pub fn load(&mut self, loaded: LoadedLog) -> Vec<PlayerEvent> {
        let mut events = self.stop();
        self.cancel_pending();
        self.clock.stop();
        self.cursor = 0;
        self.log = loaded.log;

        events.push(PlayerEvent::Loaded {
            len: self.log.len(),
            duration_ms: self.log.duration_ms(),
            rejected: loaded.rejected.len(),
        });
        events.extend(loaded.rejected.into_iter().map(|entry| PlayerEvent::Error {
            kind: PlayerErrorKind::MalformedAction,
            message: format!("Action #{} skipped: {}", entry.index, entry.reason),
        }));
        events
    }

    pub fn play(&mut self, now: Instant) -> Vec<PlayerEvent> {
        match self.clock.status() {
            PlaybackStatus::Playing => return Vec::new(),
            PlaybackStatus::Paused => {}
            PlaybackStatus::Stopped => {
                self.cursor = self
                    .log
                    .first_index_at_or_after(self.clock.anchor_position());
            }
        }
        self.clock.start(now);
        let mut events = vec![PlayerEvent::Play {
            timestamp: self.clock.anchor_position(),
        }];
        self.schedule(now, &mut events);
        events
    }

    pub fn pause(&mut self, now: Instant) -> Vec<PlayerEvent> {
        if !self.clock.is_playing() {
            return Vec::new();
        }
        self.cancel_pending();
        self.clock.pause(now);
        vec![PlayerEvent::Pause {
            timestamp: self.clock.anchor_position(),
        }]
    }

    pub fn stop(&mut self) -> Vec<PlayerEvent> {
        if self.clock.status() == PlaybackStatus::Stopped {
            return Vec::new();
        }
        self.cancel_pending();
        self.clock.stop();
        self.cursor = 0;
        vec![PlayerEvent::Stop]
    }

    /// Moves the position, clamped to the log duration. Playback state is
    /// preserved; a running timeline is rescheduled from the new position.
    pub fn seek_to(&mut self, now: Instant, timestamp: u64) -> Vec<PlayerEvent> {
        let target = timestamp.min(self.log.duration_ms());
        let was_playing = self.clock.is_playing();
        if was_playing {
            self.cancel_pending();
            self.clock.pause(now);
        }
        self.clock.set_position(target);
        self.cursor = self.log.first_index_at_or_after(target);

        let mut events = vec![PlayerEvent::Seek { timestamp: target }];
        if was_playing {
            self.clock.start(now);
            self.schedule(now, &mut events);
        }
        events
    }

    /// Changes the playback rate. Invalid rates are ignored.
    pub fn set_playback_speed(&mut self, now: Instant, speed: f64) -> Vec<PlayerEvent> {
        if !(speed.is_finite() && speed > 0.0) {
            tracing::warn!("Ignoring invalid playback speed {}", speed);
            return Vec::new();
        }
        let was_playing = self.clock.is_playing();
        if was_playing {
            self.cancel_pending();
            self.clock.pause(now);
        }
        self.clock.set_speed(speed);

        let mut events = vec![PlayerEvent::SpeedChanged { speed }];
        if was_playing {
            self.clock.start(now);
            self.schedule(now, &mut events);
        }
        events
    }

    /// Emits every pending action whose deadline has passed.
    ///
    /// `epoch` is the epoch the caller's timer was armed for; a stale timer
    /// produces nothing.
    pub fn fire_due(&mut self, now: Instant, epoch: u64) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        if epoch != self.epoch || !self.clock.is_playing() {
            tracing::trace!("Ignoring timer for epoch {} (current {})", epoch, self.epoch);
            return events;
        }

        while let Some(Reverse(next)) = self.pending.peek().copied() {
            if next.deadline > now {
                break;
            }
            self.pending.pop();
            if next.epoch != self.epoch {
                continue;
            }
            if let Some(record) = self.log.get(next.index) {
                events.push(PlayerEvent::Action(record.clone()));
            }
            self.cursor = next.index.saturating_add(1);
            if self.cursor >= self.log.len() {
                self.finish_pass(now, &mut events);
                break;
            }
        }
        events
    }

    /// Emits whatever is already due under the current epoch. Run before a
    /// transition so actions whose deadline passed are not cancelled unseen.
    pub fn flush_due(&mut self, now: Instant) -> Vec<PlayerEvent> {
        self.fire_due(now, self.epoch)
    }

    fn cancel_pending(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.pending.clear();
    }

    /// Arms every action from the cursor on. Actions behind the current
    /// position are emitted at once in debug catch-up mode and skipped
    /// otherwise.
    fn schedule(&mut self, now: Instant, events: &mut Vec<PlayerEvent>) {
        self.cancel_pending();
        let position = self.clock.anchor_position();

        while let Some(record) = self.log.get(self.cursor) {
            if record.timestamp >= position {
                break;
            }
            if self.debug_catch_up {
                events.push(PlayerEvent::Action(record.clone()));
            } else {
                tracing::trace!(
                    "Skipping {} at {}ms behind position {}ms",
                    record.kind,
                    record.timestamp,
                    position
                );
            }
            self.cursor = self.cursor.saturating_add(1);
        }

        for (offset, record) in self.log.records().iter().skip(self.cursor).enumerate() {
            let Some(deadline) = self.clock.deadline_for(record.timestamp) else {
                break;
            };
            self.pending.push(Reverse(PendingEmission {
                deadline,
                index: self.cursor.saturating_add(offset),
                epoch: self.epoch,
            }));
        }

        if self.pending.is_empty() {
            self.finish_pass(now, events);
        }
    }

    fn finish_pass(&mut self, now: Instant, events: &mut Vec<PlayerEvent>) {
        if self.loop_playback && !self.log.is_empty() {
            tracing::debug!("Reached end of log, looping");
            self.cancel_pending();
            self.cursor = 0;
            self.clock.set_position(0);
            self.clock.start(now);
            events.push(PlayerEvent::Looped);
            self.schedule(now, events);
        } else {
            tracing::debug!("Reached end of log, stopping");
            events.extend(self.stop());
        }
    }
}
