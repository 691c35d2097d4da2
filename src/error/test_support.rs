use super::{ConfigError, ReplayError, SinkError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ReplayError {
    fn from(message: &'static str) -> Self {
        ReplayError::TestExpectation { message }
    }
}

impl From<String> for ReplayError {
    fn from(value: String) -> Self {
        ReplayError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for SinkError {
    fn from(message: &'static str) -> Self {
        SinkError::TestExpectation { message }
    }
}

impl From<String> for SinkError {
    fn from(value: String) -> Self {
        SinkError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
