use std::fmt;

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::state::ReconciliationState;

/// What the merge did with one incoming field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The field had no value; the incoming value was written.
    Filled,

    /// The field had a value with no tracked confidence (typed by the user,
    /// or set outside the engine); the incoming value overwrote it.
    Reclaimed,

    /// The incoming confidence was strictly higher; the value was replaced.
    Replaced,

    /// Confidences were equal; the incoming value won the tie.
    TieReplaced,

    /// The incoming confidence was lower; the stored value was kept.
    Kept,
}

impl MergeOutcome {
    /// Returns true if the incoming value was written.
    #[must_use]
    pub const fn took_incoming(self) -> bool {
        !matches!(self, Self::Kept)
    }

    /// Returns a short stable identifier suitable for logging/debugging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Filled => "filled",
            Self::Reclaimed => "reclaimed",
            Self::Replaced => "replaced",
            Self::TieReplaced => "tie_replaced",
            Self::Kept => "kept",
        }
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Merge decision for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecision {
    pub field: String,
    pub outcome: MergeOutcome,
    /// Confidence tracked before the merge; `None` if there was none.
    pub previous: Option<Confidence>,
    pub incoming: Confidence,
    /// Whether the field's provenance was replaced.
    pub provenance_updated: bool,
}

/// Result of [`super::reconcile_detailed`]: the next state plus one
/// decision per incoming field, in field-name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: ReconciliationState,
    pub decisions: Vec<FieldDecision>,
}

impl Reconciliation {
    /// Number of decisions with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: MergeOutcome) -> usize {
        self.decisions.iter().filter(|d| d.outcome == outcome).count()
    }

    /// Names of the fields whose value was written by this merge.
    pub fn changed_fields(&self) -> impl Iterator<Item = &str> {
        self.decisions
            .iter()
            .filter(|d| d.outcome.took_incoming())
            .map(|d| d.field.as_str())
    }

    /// Decision for `field`, if it was part of the incoming result.
    #[must_use]
    pub fn decision(&self, field: &str) -> Option<&FieldDecision> {
        self.decisions.iter().find(|d| d.field == field)
    }
}
