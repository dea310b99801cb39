//! Prefill reconciliation engine.
//!
//! Two pure transitions over [`crate::ReconciliationState`]: merge an
//! extraction result in by confidence, or demote a field the user edited.
//! Both are synchronous and do no I/O, so extraction results may arrive in
//! any order as long as the caller applies each returned state wholesale.

mod decision;
mod merge;

pub use decision::{FieldDecision, MergeOutcome, Reconciliation};
pub use merge::{on_manual_edit, reconcile, reconcile_all, reconcile_detailed};
