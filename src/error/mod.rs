mod app;
mod config;
mod replay;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use replay::ReplayError;
pub use sink::SinkError;
pub use validation::ValidationError;
