//! Field-level validation shared by entity models.
//!
//! # Invariants
//! - Monetary values must be finite.
//! - Day-of-month values stay within `1..=31`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for an entity payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Monetary field is NaN or infinite.
    NonFinite { field: &'static str },
    /// Field must be strictly positive.
    NotPositive { field: &'static str, value: f64 },
    /// Field must be zero or greater.
    Negative { field: &'static str, value: f64 },
    /// Day-of-month outside `1..=31`.
    DayOutOfRange { field: &'static str, value: u8 },
    /// Required identifier or label is blank.
    Blank { field: &'static str },
    /// Another entry of the same collection already uses this id.
    DuplicateId { field: &'static str, id: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be greater than zero, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::DayOutOfRange { field, value } => {
                write!(f, "{field} must be within 1..=31, got {value}")
            }
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::DuplicateId { field, id } => write!(f, "{field} `{id}` is already in use"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn require_day_of_month(field: &'static str, value: u8) -> Result<(), ValidationError> {
    if (1..=31).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::DayOutOfRange { field, value })
    }
}

pub(crate) fn require_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}

pub(crate) fn require_unused_id(
    field: &'static str,
    id: &str,
    taken: bool,
) -> Result<(), ValidationError> {
    if taken {
        Err(ValidationError::DuplicateId {
            field,
            id: id.to_string(),
        })
    } else {
        Ok(())
    }
}
