//! Badge summaries for auto-filled fields.
//!
//! A badge is what presentation code renders next to an input the engine
//! filled in: "auto-filled, N% confidence", plus a tooltip with the source
//! snippet. Fields the user has edited never produce a badge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PrefillConfig;
use crate::confidence::{Confidence, ConfidenceBand};
use crate::provenance::SourceLocator;
use crate::state::ReconciliationState;

/// Display summary of one auto-filled field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBadge {
    pub field: String,
    pub confidence: Confidence,
    /// Confidence as a whole percentage, clamped to `0..=100`.
    pub percent: u8,
    pub band: ConfidenceBand,

    /// Provenance snippet, truncated to the configured length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<SourceLocator>,
}

impl FieldBadge {
    /// Builds the badge for `field`, or `None` if it is not auto-filled.
    #[must_use]
    pub fn for_field(state: &ReconciliationState, field: &str, config: &PrefillConfig) -> Option<Self> {
        let confidence = state.confidence(field)?;
        let provenance = state.provenance(field);

        Some(Self {
            field: field.to_string(),
            confidence,
            percent: confidence.percent(),
            band: ConfidenceBand::classify(confidence, config.high_confidence, config.medium_confidence),
            snippet: provenance
                .map(|p| p.truncated_snippet(config.snippet_max_chars))
                .filter(|s| !s.is_empty()),
            locator: provenance
                .map(|p| p.locator.clone())
                .filter(|l| !l.is_empty()),
        })
    }

    /// Tooltip text: the quoted snippet, followed by its location when known.
    ///
    /// The snippet is whatever provenance the field holds. If the winning
    /// extraction sent no record for the field, that is still the record
    /// from an earlier extraction, and it may quote a different value.
    #[must_use]
    pub fn tooltip(&self) -> Option<String> {
        let snippet = self.snippet.as_deref()?;
        Some(match &self.locator {
            Some(locator) => format!("\"{snippet}\" ({locator})"),
            None => format!("\"{snippet}\""),
        })
    }
}

impl fmt::Display for FieldBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auto-filled, {}% confidence", self.percent)
    }
}

/// Badges for every auto-filled field, in field-name order.
#[must_use]
pub fn badges(state: &ReconciliationState, config: &PrefillConfig) -> Vec<FieldBadge> {
    state
        .auto_filled_fields()
        .filter_map(|field| FieldBadge::for_field(state, field, config))
        .collect()
}
