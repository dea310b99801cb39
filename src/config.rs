//! Presentation configuration for prefill badges.
//!
//! None of these settings affect the merge rule; they only shape how an
//! auto-filled field is summarised for the form.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrefillResult, ValidationError};

/// Prefill configuration.
///
/// Every field has a default, so a partial JSON document is accepted.
///
/// # Examples
///
/// ```
/// use loan_prefill::PrefillConfig;
///
/// let config = PrefillConfig::from_json(r#"{"snippet_max_chars": 80}"#).unwrap();
/// assert_eq!(config.snippet_max_chars, 80);
/// assert!((config.high_confidence - 0.8).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefillConfig {
    /// Inclusive lower bound of the "high" band.
    pub high_confidence: f64,
    /// Inclusive lower bound of the "medium" band.
    pub medium_confidence: f64,
    /// Longest provenance snippet shown in a tooltip, in characters.
    pub snippet_max_chars: usize,
}

impl Default for PrefillConfig {
    fn default() -> Self {
        Self {
            high_confidence: 0.8,
            medium_confidence: 0.5,
            snippet_max_chars: 120,
        }
    }
}

impl PrefillConfig {
    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed JSON, or a validation error
    /// from [`PrefillConfig::validate`].
    pub fn from_json(json: &str) -> PrefillResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise the same
    /// errors as [`PrefillConfig::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> PrefillResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Checks threshold ranges and ordering.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a threshold is outside `[0, 1]` (or
    /// NaN), if `medium_confidence > high_confidence`, or if
    /// `snippet_max_chars` is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_threshold("high_confidence", self.high_confidence)?;
        check_threshold("medium_confidence", self.medium_confidence)?;
        if self.medium_confidence > self.high_confidence {
            return Err(ValidationError::ThresholdOrder {
                medium: self.medium_confidence,
                high: self.high_confidence,
            });
        }
        if self.snippet_max_chars == 0 {
            return Err(ValidationError::MustBePositive {
                field: "snippet_max_chars",
            });
        }
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}
