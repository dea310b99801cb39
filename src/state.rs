//! Reconciliation state held for one applicant session.
//!
//! The state is a plain value. Transitions in [`crate::reconcile`] take a
//! reference to the current state and return a fresh one; nothing here is
//! mutated behind the caller's back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::confidence::Confidence;
use crate::provenance::ProvenanceEntry;
use crate::value::FieldValue;

/// A broken consistency rule between the three maps of a state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Field '{field}' has a confidence entry but no merged value")]
    ConfidenceWithoutValue {
        field: String,
    },

    #[error("Field '{field}' has a provenance entry but no confidence entry")]
    ProvenanceWithoutConfidence {
        field: String,
    },

    #[error("Provenance stored under '{key}' names field '{named}'")]
    ProvenanceKeyMismatch {
        key: String,
        named: String,
    },
}

/// Merged form values plus what the engine knows about how they got there.
///
/// A field has a confidence (and possibly provenance) entry only while its
/// value is the one the engine last wrote. A manual edit drops both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationState {
    #[serde(default)]
    pub(crate) merged_fields: BTreeMap<String, FieldValue>,

    #[serde(default)]
    pub(crate) field_confidence: BTreeMap<String, Confidence>,

    #[serde(default)]
    pub(crate) field_provenance: BTreeMap<String, ProvenanceEntry>,
}

impl ReconciliationState {
    /// Creates an empty state for a new session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of every field that has one.
    #[must_use]
    pub const fn merged_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.merged_fields
    }

    /// Confidence of every field whose value came from an extraction.
    #[must_use]
    pub const fn field_confidence(&self) -> &BTreeMap<String, Confidence> {
        &self.field_confidence
    }

    /// Provenance of every auto-filled field that had a matching record.
    #[must_use]
    pub const fn field_provenance(&self) -> &BTreeMap<String, ProvenanceEntry> {
        &self.field_provenance
    }

    #[must_use]
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.merged_fields.get(field)
    }

    #[must_use]
    pub fn confidence(&self, field: &str) -> Option<Confidence> {
        self.field_confidence.get(field).copied()
    }

    #[must_use]
    pub fn provenance(&self, field: &str) -> Option<&ProvenanceEntry> {
        self.field_provenance.get(field)
    }

    /// Returns true if the field's current value was set by the engine.
    #[must_use]
    pub fn is_auto_filled(&self, field: &str) -> bool {
        self.field_confidence.contains_key(field)
    }

    /// Names of all auto-filled fields, in order.
    pub fn auto_filled_fields(&self) -> impl Iterator<Item = &str> {
        self.field_confidence.keys().map(String::as_str)
    }

    /// Returns true if no field has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged_fields.is_empty()
    }

    /// Returns a copy with `field` set to a value typed by the user.
    ///
    /// Only the merged value changes. Pair it with
    /// [`crate::reconcile::on_manual_edit`] to drop the field's badge.
    #[must_use]
    pub fn with_user_value(&self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let mut next = self.clone();
        next.merged_fields.insert(field.into(), value.into());
        next
    }

    /// Checks that confidence keys are a subset of merged keys, that
    /// provenance keys are a subset of confidence keys, and that each
    /// provenance record is stored under its own field name.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for field in self.field_confidence.keys() {
            if !self.merged_fields.contains_key(field) {
                return Err(InvariantViolation::ConfidenceWithoutValue {
                    field: field.clone(),
                });
            }
        }
        for (key, entry) in &self.field_provenance {
            if !self.field_confidence.contains_key(key) {
                return Err(InvariantViolation::ProvenanceWithoutConfidence { field: key.clone() });
            }
            if entry.field != *key {
                return Err(InvariantViolation::ProvenanceKeyMismatch {
                    key: key.clone(),
                    named: entry.field.clone(),
                });
            }
        }
        Ok(())
    }
}
