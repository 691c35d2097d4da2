use tokio::time::Instant;

/// Wall-clock anchor for a recording pass.
///
/// Stamps are milliseconds since [`RecordingClock::start`]. The record side
/// never pauses or rewinds, so the clock only moves forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingClock {
    started_at: Option<Instant>,
}

impl RecordingClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { started_at: None }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub const fn start_at(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    #[must_use]
    pub fn elapsed(&self) -> u64 {
        self.elapsed_at(Instant::now())
    }

    /// Milliseconds between the start anchor and `now`; 0 before start.
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> u64 {
        self.started_at.map_or(0, |started_at| {
            u64::try_from(now.saturating_duration_since(started_at).as_millis())
                .unwrap_or(u64::MAX)
        })
    }
}
