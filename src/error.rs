//! Error types for loan-prefill.
//!
//! The reconciliation transitions themselves are total and never fail.
//! Errors only arise at the edges: decoding Extraction Service payloads,
//! loading configuration, and session edits with bad input.

use thiserror::Error;

/// Validation errors that occur during input validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Threshold '{name}' value {value} is out of range [0.0, 1.0]")]
    ThresholdOutOfRange {
        name: &'static str,
        value: f64,
    },

    #[error("Medium confidence threshold {medium} must not exceed high threshold {high}")]
    ThresholdOrder {
        medium: f64,
        high: f64,
    },

    #[error("Field '{field}' must be greater than zero")]
    MustBePositive {
        field: &'static str,
    },

    #[error("Field name cannot be empty")]
    EmptyFieldName,
}

/// Errors raised while decoding external JSON documents.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object at the top level, found {found}")]
    NotAnObject {
        found: &'static str,
    },
}

/// Top-level error type for loan-prefill.
#[derive(Debug, Error)]
pub enum PrefillError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrefillError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a decode error.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<serde_json::Error> for PrefillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(DecodeError::Json(err))
    }
}

/// Result type alias for loan-prefill operations.
pub type PrefillResult<T> = Result<T, PrefillError>;

/// Names the JSON type of a value, for error messages.
pub(crate) const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
