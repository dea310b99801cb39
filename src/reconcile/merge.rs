use crate::confidence::Confidence;
use crate::extraction::ExtractionResult;
use crate::reconcile::{FieldDecision, MergeOutcome, Reconciliation};
use crate::state::ReconciliationState;

/// Merge `incoming` into `current` by per-field confidence.
///
/// For each field in `incoming.fields`, the incoming value is written when
/// the field has no value yet, or when the incoming confidence is at least
/// the tracked one (missing confidences read as zero, so ties go to the
/// later result). Provenance follows the same comparison, using the first
/// record that names the field. Fields not in `incoming.fields` are left
/// as they are.
#[must_use]
pub fn reconcile(current: &ReconciliationState, incoming: &ExtractionResult) -> ReconciliationState {
    reconcile_detailed(current, incoming).state
}

/// Like [`reconcile`], but also reports what happened to each field.
#[must_use]
pub fn reconcile_detailed(current: &ReconciliationState, incoming: &ExtractionResult) -> Reconciliation {
    let mut next = current.clone();
    let mut decisions = Vec::with_capacity(incoming.fields.len());

    for (field, value) in &incoming.fields {
        let tracked = current.confidence(field);
        let prev_conf = tracked.unwrap_or(Confidence::ZERO);
        let new_conf = incoming.confidence_for(field);
        let has_value = current.merged_fields.contains_key(field);
        let supersedes = new_conf.supersedes(prev_conf);

        let outcome = match (has_value, tracked, supersedes) {
            (false, _, _) => MergeOutcome::Filled,
            (true, _, false) => MergeOutcome::Kept,
            (true, None, true) => MergeOutcome::Reclaimed,
            (true, Some(prev), true) if new_conf == prev => MergeOutcome::TieReplaced,
            (true, Some(_), true) => MergeOutcome::Replaced,
        };

        if outcome.took_incoming() {
            next.merged_fields.insert(field.clone(), value.clone());
            next.field_confidence.insert(field.clone(), new_conf);
        }

        // Same comparison as the value, but applied independently: an
        // unfilled field with a NaN score gets the value and no provenance.
        let mut provenance_updated = false;
        if supersedes {
            if let Some(entry) = incoming.provenance_for(field) {
                next.field_provenance.insert(field.clone(), entry.clone());
                provenance_updated = true;
            }
        }

        decisions.push(FieldDecision {
            field: field.clone(),
            outcome,
            previous: tracked,
            incoming: new_conf,
            provenance_updated,
        });
    }

    Reconciliation {
        state: next,
        decisions,
    }
}

/// Folds [`reconcile`] over `results` in order.
#[must_use]
pub fn reconcile_all<'a, I>(current: &ReconciliationState, results: I) -> ReconciliationState
where
    I: IntoIterator<Item = &'a ExtractionResult>,
{
    results
        .into_iter()
        .fold(current.clone(), |state, result| reconcile(&state, result))
}

/// Demote `field` after a direct user edit.
///
/// Drops the field's confidence and provenance; its merged value is left
/// for the form layer to overwrite. With no tracked confidence, the next
/// extraction that carries the field replaces it even at confidence zero.
#[must_use]
pub fn on_manual_edit(current: &ReconciliationState, field: &str) -> ReconciliationState {
    let mut next = current.clone();
    next.field_confidence.remove(field);
    next.field_provenance.remove(field);
    next
}
