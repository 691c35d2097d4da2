pub mod clock;
pub mod config;
pub mod events;
pub mod loader;
pub mod player;
pub mod scheduler;

pub use clock::{PlaybackClock, PlaybackStatus};
pub use config::PlayerConfig;
pub use events::{EventHub, PlayerErrorKind, PlayerEvent};
pub use loader::{LoadedLog, RejectedAction, load_action_log, parse_action_log};
pub use player::Player;
pub use scheduler::{PlaybackSnapshot, Scheduler};
