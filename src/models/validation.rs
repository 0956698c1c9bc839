//! Field-level validation for incoming requests.

use thiserror::Error;

/// A request failed one of its field rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub(crate) fn require_not_blank(value: &str, message: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(message));
    }
    Ok(())
}

/// Check `value >= min` and narrow it to `u32`.
pub(crate) fn require_at_least(
    value: i64,
    min: i64,
    message: &str,
) -> Result<u32, ValidationError> {
    if value < min {
        return Err(ValidationError::new(message));
    }
    u32::try_from(value)
        .map_err(|_| ValidationError::new(format!("{} (value too large)", message)))
}
