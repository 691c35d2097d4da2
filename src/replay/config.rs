use crate::error::ValidationError;

pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Player options, validated once before the player task is spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    speed: f64,
    loop_playback: bool,
    debug_catch_up: bool,
    event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            loop_playback: false,
            debug_catch_up: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl PlayerConfig {
    /// # Errors
    ///
    /// Returns an error when `speed` is not a positive finite number or the
    /// event capacity is zero.
    pub fn new(
        speed: f64,
        loop_playback: bool,
        debug_catch_up: bool,
        event_capacity: usize,
    ) -> Result<Self, ValidationError> {
        validate_speed(speed)?;
        if event_capacity == 0 {
            return Err(ValidationError::InvalidEventCapacity);
        }
        Ok(Self {
            speed,
            loop_playback,
            debug_catch_up,
            event_capacity,
        })
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub const fn loop_playback(&self) -> bool {
        self.loop_playback
    }

    #[must_use]
    pub const fn debug_catch_up(&self) -> bool {
        self.debug_catch_up
    }

    #[must_use]
    pub const fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

/// # Errors
///
/// Returns an error unless `speed` is finite and greater than zero.
pub fn validate_speed(speed: f64) -> Result<f64, ValidationError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(ValidationError::NonPositiveSpeed { value: speed })
    }
}
