use crate::domain::ActionKind;
use crate::error::{AppResult, ValidationError};
use crate::replay::config::validate_speed;

pub(super) fn parse_speed(s: &str) -> AppResult<f64> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|err| ValidationError::InvalidNumber {
            value: s.to_owned(),
            source: err,
        })?;
    Ok(validate_speed(value)?)
}

pub(super) fn parse_action_kind(s: &str) -> AppResult<ActionKind> {
    Ok(s.parse::<ActionKind>()?)
}
