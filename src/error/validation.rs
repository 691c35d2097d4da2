use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Playback speed must be a positive finite number, got {value}.")]
    NonPositiveSpeed { value: f64 },
    #[error("Event channel capacity must be >= 1.")]
    InvalidEventCapacity,
    #[error("Recording file name must not be empty.")]
    EmptyFileName,
    #[error("Unknown action type '{value}'.")]
    UnknownActionKind { value: String },
    #[error("Invalid capture on line {line}: {source}")]
    InvalidCapture {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid number '{value}': {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
