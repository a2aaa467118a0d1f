//! STAC document validation errors.

use thiserror::Error;

/// A structural problem found in a STAC document.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field holds a value outside what STAC allows.
    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// A required link relation is absent.
    #[error("Missing '{0}' link")]
    MissingLink(&'static str),

    /// A field uses an extension not declared in `stac_extensions`.
    #[error("Extension not declared: {0}")]
    UndeclaredExtension(String),

    /// The footprint is not a closed ring.
    #[error("Invalid geometry: {0}")]
    Geometry(String),
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
