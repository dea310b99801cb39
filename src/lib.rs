//! # loan-prefill - Prefill reconciliation for loan application forms
//!
//! Applicants can prefill a loan form from pasted text or an uploaded PDF.
//! An external Extraction Service turns each input into field guesses with
//! a confidence score and a provenance snippet. This crate merges those
//! guesses into one reviewable field set.
//!
//! ## Core Concepts
//!
//! - **ExtractionResult**: one response from the Extraction Service
//! - **ReconciliationState**: merged values plus confidence and provenance for auto-filled fields
//! - **reconcile**: merge a result in; a value is replaced only by an equal or higher confidence
//! - **on_manual_edit**: drop a field's confidence and provenance once the user types into it
//! - **PrefillSession**: owns the state for one applicant form and logs what happens to it
//!
//! ## Usage
//!
//! ```rust
//! use loan_prefill::{on_manual_edit, reconcile, ExtractionResult, FieldValue, ReconciliationState};
//!
//! let text = ExtractionResult::new().with_field("income_annum", 900_000, 0.4);
//! let pdf = ExtractionResult::new().with_field("income_annum", 850_000, 0.4);
//!
//! let state = reconcile(&ReconciliationState::new(), &text);
//! let state = reconcile(&state, &pdf);
//! assert_eq!(state.value("income_annum"), Some(&FieldValue::Int(850_000)));
//!
//! let state = on_manual_edit(&state, "income_annum");
//! assert!(!state.is_auto_filled("income_annum"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Wire and value types
pub mod confidence;
pub mod error;
pub mod extraction;
pub mod provenance;
pub mod value;

// Engine
pub mod reconcile;
pub mod state;

// Presentation and session
pub mod badge;
pub mod config;
pub mod session;

pub use badge::{badges, FieldBadge};
pub use confidence::{Confidence, ConfidenceBand};
pub use config::PrefillConfig;
pub use error::{DecodeError, PrefillError, PrefillResult, ValidationError};
pub use extraction::{ExtractionResult, ExtractionSource};
pub use provenance::{ProvenanceEntry, SourceLocator};
pub use reconcile::{
    on_manual_edit, reconcile, reconcile_all, reconcile_detailed, FieldDecision, MergeOutcome,
    Reconciliation,
};
pub use session::{PrefillSession, SessionId};
pub use state::{InvariantViolation, ReconciliationState};
pub use value::FieldValue;
