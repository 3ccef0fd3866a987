//! Validation error types

use std::fmt;

/// Validation error for request shapes and enumerated fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value outside a closed set of legal strings
    InvalidVariant { field: &'static str, value: String },

    /// Value has the wrong type or cannot be parsed (e.g., a date)
    InvalidFormat { field: &'static str, reason: String },

    /// Field was explicitly set to null but has no null state
    NullNotAllowed { field: &'static str },

    /// Body, query string or path could not be decoded at all
    Malformed { location: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::NullNotAllowed { field } => write!(f, "{} cannot be null", field),
            Self::Malformed { location, reason } => {
                write!(f, "invalid request {}: {}", location, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
