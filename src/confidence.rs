//! Confidence scores attached to extracted fields.
//!
//! The Extraction Service reports a score in `[0, 1]` per field. The score
//! is only ever compared against another score for the same field, never
//! read as a calibrated probability, so values are carried verbatim and
//! out-of-range input is not rejected.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Extraction confidence for a single field.
///
/// # Examples
///
/// ```
/// use loan_prefill::Confidence;
///
/// let stored = Confidence::new(0.4);
/// let incoming = Confidence::new(0.4);
/// assert!(incoming.supersedes(stored)); // ties go to the newer value
/// assert_eq!(Confidence::new(0.857).percent(), 86);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Score used when a field has no confidence entry.
    pub const ZERO: Self = Self(0.0);

    /// Wraps a raw score. No range check is applied.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether a value carrying `self` may replace one carrying `stored`.
    ///
    /// Equal scores supersede, so on a tie the later extraction wins.
    /// A NaN score never supersedes anything.
    #[must_use]
    pub fn supersedes(self, stored: Self) -> bool {
        self.0 >= stored.0
    }

    /// Returns true if the raw score lies in `[0, 1]`.
    #[must_use]
    pub fn is_in_range(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }

    /// Score as a whole percentage for display, clamped to `0..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(self) -> u8 {
        if self.0.is_nan() {
            return 0;
        }
        (self.0.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Coarse confidence level used when rendering badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Classifies `confidence` against the given thresholds.
    ///
    /// `high` and `medium` are inclusive lower bounds.
    #[must_use]
    pub fn classify(confidence: Confidence, high: f64, medium: f64) -> Self {
        let value = confidence.value();
        if value >= high {
            Self::High
        } else if value >= medium {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Deserializes a field → confidence map, dropping entries that are not
/// numbers (or numeric strings). Strings that parse to NaN or infinity are
/// dropped too. A `null` map is treated as empty.
pub(crate) fn deserialize_confidence_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Confidence>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(BTreeMap::new());
    };

    Ok(raw
        .into_iter()
        .filter_map(|(field, value)| {
            let score = match &value {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
                _ => None,
            }?;
            Some((field, Confidence::new(score)))
        })
        .collect())
}
