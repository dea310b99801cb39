//! Caller-side owner of the reconciliation state for one applicant form.
//!
//! The engine's transitions are pure; something still has to hold the
//! current state and swap in each result. `PrefillSession` does that, and
//! is where prefill activity gets logged. Every operation replaces the
//! whole state, so a `&mut` borrow is all the exclusion a single form
//! needs. Callers that receive extraction results on several threads
//! should funnel them to the session owner (or wrap it in a mutex).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::badge::{self, FieldBadge};
use crate::config::PrefillConfig;
use crate::error::{PrefillResult, ValidationError};
use crate::extraction::{ExtractionResult, ExtractionSource};
use crate::reconcile::{self, FieldDecision, MergeOutcome};
use crate::state::ReconciliationState;
use crate::value::FieldValue;

/// Unique identifier for a prefill session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Prefill state for a single applicant session.
///
/// # Examples
///
/// ```
/// use loan_prefill::{ExtractionResult, ExtractionSource, PrefillSession};
///
/// let mut session = PrefillSession::new();
/// session.apply(
///     ExtractionSource::Text,
///     &ExtractionResult::new().with_field("cibil_score", 782, 0.9),
/// );
/// assert_eq!(session.badge("cibil_score").unwrap().percent, 90);
///
/// session.edit_field("cibil_score", 790).unwrap();
/// assert!(session.badge("cibil_score").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PrefillSession {
    id: SessionId,
    started_at: DateTime<Utc>,
    config: PrefillConfig,
    state: ReconciliationState,
    extractions_applied: usize,
}

impl Default for PrefillSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefillSession {
    /// Starts an empty session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            started_at: Utc::now(),
            config: PrefillConfig::default(),
            state: ReconciliationState::new(),
            extractions_applied: 0,
        }
    }

    /// Starts an empty session with `config`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `config` is invalid.
    pub fn with_config(config: PrefillConfig) -> PrefillResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub const fn config(&self) -> &PrefillConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &ReconciliationState {
        &self.state
    }

    /// Number of extraction results applied since the session started (or
    /// was last reset).
    #[must_use]
    pub const fn extractions_applied(&self) -> usize {
        self.extractions_applied
    }

    /// Merges an extraction result into the session and returns the
    /// per-field decisions.
    pub fn apply(&mut self, source: ExtractionSource, result: &ExtractionResult) -> Vec<FieldDecision> {
        let outcome = reconcile::reconcile_detailed(&self.state, result);

        for decision in &outcome.decisions {
            trace!(
                session = %self.id,
                %source,
                field = %decision.field,
                outcome = %decision.outcome,
                incoming = decision.incoming.value(),
                previous = decision.previous.map(|c| c.value()),
                "prefill field decision"
            );
        }
        debug!(
            session = %self.id,
            %source,
            fields = result.fields.len(),
            filled = outcome.count(MergeOutcome::Filled),
            reclaimed = outcome.count(MergeOutcome::Reclaimed),
            replaced = outcome.count(MergeOutcome::Replaced) + outcome.count(MergeOutcome::TieReplaced),
            kept = outcome.count(MergeOutcome::Kept),
            "applied extraction result"
        );

        self.state = outcome.state;
        self.extractions_applied += 1;
        outcome.decisions
    }

    /// Records a value the user typed into `field`.
    ///
    /// The value becomes the field's merged value and the field loses its
    /// confidence and provenance. Returns true if the field had been
    /// auto-filled.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyFieldName` if `field` is empty.
    pub fn edit_field(&mut self, field: &str, value: impl Into<FieldValue>) -> PrefillResult<bool> {
        if field.is_empty() {
            return Err(ValidationError::EmptyFieldName.into());
        }

        let was_auto_filled = self.state.is_auto_filled(field);
        let next = self.state.with_user_value(field, value);
        self.state = reconcile::on_manual_edit(&next, field);

        if was_auto_filled {
            debug!(session = %self.id, field, "manual edit demoted auto-filled field");
        }
        Ok(was_auto_filled)
    }

    /// Badge for `field`, if it is currently auto-filled.
    #[must_use]
    pub fn badge(&self, field: &str) -> Option<FieldBadge> {
        FieldBadge::for_field(&self.state, field, &self.config)
    }

    /// Badges for all auto-filled fields.
    #[must_use]
    pub fn badges(&self) -> Vec<FieldBadge> {
        badge::badges(&self.state, &self.config)
    }

    /// Discards all prefill state, keeping the session id and config.
    pub fn reset(&mut self) {
        debug!(session = %self.id, "prefill session reset");
        self.state = ReconciliationState::new();
        self.extractions_applied = 0;
    }

    /// Consumes the session, returning its final state.
    #[must_use]
    pub fn into_state(self) -> ReconciliationState {
        self.state
    }
}
