use std::collections::BTreeMap;

use proptest::prelude::*;

use loan_prefill::{
    on_manual_edit, reconcile, Confidence, ExtractionResult, FieldValue, ProvenanceEntry,
    ReconciliationState,
};

const FIELDS: &[&str] = &["income_annum", "cibil_score", "loan_term", "education"];

/// Confidences on a coarse grid so ties come up often.
fn confidence() -> impl Strategy<Value = f64> {
    (0u8..=4).prop_map(|n| f64::from(n) / 4.0)
}

fn field_name() -> impl Strategy<Value = String> {
    prop::sample::select(FIELDS).prop_map(str::to_string)
}

/// (value, confidence if scored, has provenance) per field.
type RawResult = BTreeMap<String, (i64, Option<f64>, bool)>;

fn raw_result() -> impl Strategy<Value = RawResult> {
    prop::collection::btree_map(
        field_name(),
        (0i64..1_000, prop::option::of(confidence()), any::<bool>()),
        0..=FIELDS.len(),
    )
}

fn build(raw: &RawResult, tag: &str) -> ExtractionResult {
    let mut result = ExtractionResult::new();
    for (field, (value, conf, with_provenance)) in raw {
        result = match conf {
            Some(c) => result.with_field(field.clone(), *value, *c),
            None => result.with_unscored_field(field.clone(), *value),
        };
        if *with_provenance {
            result = result.with_provenance(ProvenanceEntry::new(field.clone(), format!("{tag}:{field}")));
        }
    }
    result
}

fn offered(raw: &RawResult, field: &str) -> Option<f64> {
    raw.get(field).map(|(_, c, _)| c.unwrap_or(0.0))
}

#[derive(Debug, Clone)]
enum Op {
    Extract(RawResult),
    Edit(String, i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        raw_result().prop_map(Op::Extract),
        (field_name(), 0i64..1_000).prop_map(|(f, v)| Op::Edit(f, v)),
    ]
}

proptest! {
    /// Stored confidence after two calls is the max offered for each field.
    #[test]
    fn stored_confidence_is_maximum(a in raw_result(), b in raw_result()) {
        let state = reconcile(&reconcile(&ReconciliationState::new(), &build(&a, "a")), &build(&b, "b"));

        for field in FIELDS {
            let expected = match (offered(&a, field), offered(&b, field)) {
                (Some(x), Some(y)) => Some(x.max(y)),
                (x, y) => x.or(y),
            };
            prop_assert_eq!(state.confidence(field).map(Confidence::value), expected);
        }
    }

    /// Reconciling an empty result changes nothing.
    #[test]
    fn empty_result_is_identity(a in raw_result()) {
        let state = reconcile(&ReconciliationState::new(), &build(&a, "a"));
        prop_assert_eq!(reconcile(&state, &ExtractionResult::new()), state);
    }

    /// A then B equals B then A, except on exact ties with different values,
    /// where the later call wins.
    #[test]
    fn order_independent_except_ties(a in raw_result(), b in raw_result()) {
        let (ra, rb) = (build(&a, "a"), build(&b, "b"));
        let empty = ReconciliationState::new();
        let ab = reconcile(&reconcile(&empty, &ra), &rb);
        let ba = reconcile(&reconcile(&empty, &rb), &ra);

        for field in FIELDS {
            prop_assert_eq!(ab.confidence(field), ba.confidence(field));

            match (a.get(*field), b.get(*field)) {
                (Some((va, _, _)), Some((vb, _, _)))
                    if offered(&a, field) == offered(&b, field) && va != vb =>
                {
                    prop_assert_eq!(ab.value(field), Some(&FieldValue::Int(*vb)));
                    prop_assert_eq!(ba.value(field), Some(&FieldValue::Int(*va)));
                }
                _ => {
                    prop_assert_eq!(ab.value(field), ba.value(field));
                }
            }
        }
    }

    /// After a manual edit, a zero-confidence extraction takes the field back.
    #[test]
    fn manual_edit_resets_to_zero(a in raw_result(), field in field_name(), user in 0i64..1_000, fresh in 1_000i64..2_000) {
        let state = reconcile(&ReconciliationState::new(), &build(&a, "a"));
        let edited = on_manual_edit(&state.with_user_value(field.clone(), user), &field);
        prop_assert!(!edited.is_auto_filled(&field));
        prop_assert!(edited.provenance(&field).is_none());

        let next = reconcile(&edited, &ExtractionResult::new().with_field(field.clone(), fresh, 0.0));
        prop_assert_eq!(next.value(&field), Some(&FieldValue::Int(fresh)));
        prop_assert_eq!(next.confidence(&field), Some(Confidence::ZERO));
    }

    /// Any mix of extractions and edits keeps the three maps consistent.
    #[test]
    fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 0..12)) {
        let mut state = ReconciliationState::new();
        for (i, op) in ops.iter().enumerate() {
            state = match op {
                Op::Extract(raw) => reconcile(&state, &build(raw, &i.to_string())),
                Op::Edit(field, value) => on_manual_edit(&state.with_user_value(field.clone(), *value), field),
            };
            prop_assert!(state.check_invariants().is_ok());
        }
    }
}
