//! Virtual position math for the player.
//!
//! While stopped or paused the position is frozen. While playing it is
//! derived from an anchor `(instant, position)` taken at the last
//! (re)start: `position + (now - instant) * speed`. That is the same mapping
//! as `start = now - position / speed`, without needing an instant earlier
//! than the anchor itself.

use std::time::Duration;

use tokio::time::Instant;

/// Fallback offset when a deadline would overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);
const MILLIS_PER_SEC: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

impl PlaybackStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlaybackStatus::Stopped => "stopped",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    status: PlaybackStatus,
    position_ms: u64,
    anchor: Option<Instant>,
    speed: f64,
}

impl PlaybackClock {
    #[must_use]
    pub const fn new(speed: f64) -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            position_ms: 0,
            anchor: None,
            speed,
        }
    }

    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        self.status
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Frozen position, or the anchor position while playing.
    #[must_use]
    pub const fn anchor_position(&self) -> u64 {
        self.position_ms
    }

    #[must_use]
    pub fn current_timestamp(&self, now: Instant) -> u64 {
        match (self.status, self.anchor) {
            (PlaybackStatus::Playing, Some(anchor)) => self
                .position_ms
                .saturating_add(scale_to_virtual(now.saturating_duration_since(anchor), self.speed)),
            (PlaybackStatus::Playing | PlaybackStatus::Paused | PlaybackStatus::Stopped, _) => {
                self.position_ms
            }
        }
    }

    /// Anchors the current position at `now` and starts advancing.
    pub const fn start(&mut self, now: Instant) {
        self.anchor = Some(now);
        self.status = PlaybackStatus::Playing;
    }

    /// Freezes the position reached at `now`.
    pub fn pause(&mut self, now: Instant) {
        self.position_ms = self.current_timestamp(now);
        self.anchor = None;
        self.status = PlaybackStatus::Paused;
    }

    pub const fn stop(&mut self) {
        self.position_ms = 0;
        self.anchor = None;
        self.status = PlaybackStatus::Stopped;
    }

    /// Moves the frozen position. Only meaningful while not playing; a
    /// running clock is re-anchored by the caller afterwards.
    pub const fn set_position(&mut self, position_ms: u64) {
        self.position_ms = position_ms;
    }

    pub const fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Wall-clock instant at which `timestamp` is reached, or `None` when
    /// the clock is not running.
    #[must_use]
    pub fn deadline_for(&self, timestamp: u64) -> Option<Instant> {
        let anchor = self.anchor.filter(|_| self.is_playing())?;
        let offset = scale_to_wall(timestamp.saturating_sub(self.position_ms), self.speed);
        anchor
            .checked_add(offset)
            .or_else(|| anchor.checked_add(FAR_FUTURE))
            .or(Some(anchor))
    }
}

/// Virtual milliseconds covered by `elapsed` wall time at `speed`.
#[must_use]
pub fn scale_to_virtual(elapsed: Duration, speed: f64) -> u64 {
    let virtual_ms = (elapsed.as_secs_f64() * MILLIS_PER_SEC * speed).round();
    if virtual_ms.is_finite() && virtual_ms > 0.0 {
        virtual_ms as u64
    } else {
        0
    }
}

/// Wall time needed to cover `virtual_ms` at `speed`.
#[must_use]
pub fn scale_to_wall(virtual_ms: u64, speed: f64) -> Duration {
    Duration::try_from_secs_f64(virtual_ms as f64 / (MILLIS_PER_SEC * speed)).unwrap_or(FAR_FUTURE)
}
