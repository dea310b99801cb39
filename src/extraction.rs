//! Extraction results as returned by the Extraction Service.
//!
//! Both the pasted-text path and the PDF path return the same shape:
//! `{ "fields": {..}, "confidence": {..}, "provenance": [..] }`. Decoding is
//! deliberately forgiving: any of the three parts may be missing or `null`,
//! and malformed confidence or provenance entries are skipped instead of
//! failing the whole payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::confidence::{deserialize_confidence_map, Confidence};
use crate::error::{json_type_name, DecodeError, PrefillResult};
use crate::provenance::ProvenanceEntry;
use crate::value::FieldValue;

/// Which extraction path produced a result.
///
/// The merge rule does not look at this; it exists for logging and for
/// callers that want to label where a prefill came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// Free-form text pasted by the applicant.
    Text,
    /// An uploaded PDF document.
    Pdf,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

/// A single extraction result.
///
/// # Examples
///
/// ```
/// use loan_prefill::{Confidence, ExtractionResult};
///
/// let result = ExtractionResult::from_json(
///     r#"{"fields": {"income_annum": 900000}, "conf": {"income_annum": 0.4}}"#,
/// )
/// .unwrap();
/// assert_eq!(result.confidence_for("income_annum"), Confidence::new(0.4));
/// assert_eq!(result.confidence_for("cibil_score"), Confidence::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted values keyed by field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, FieldValue>,

    /// Per-field confidence; may be sparse.
    #[serde(default, alias = "conf", deserialize_with = "deserialize_confidence_map")]
    pub confidence: BTreeMap<String, Confidence>,

    /// Provenance records in the order the service sent them.
    #[serde(default, deserialize_with = "deserialize_provenance")]
    pub provenance: Vec<ProvenanceEntry>,
}

impl ExtractionResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a service payload.
    ///
    /// # Errors
    ///
    /// Returns a decode error if `json` is not valid JSON or its top level
    /// is not an object.
    pub fn from_json(json: &str) -> PrefillResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decodes an already-parsed service payload.
    ///
    /// # Errors
    ///
    /// Returns a decode error if `value` is not a JSON object, or if its
    /// `fields` member is present but not an object.
    pub fn from_value(value: serde_json::Value) -> PrefillResult<Self> {
        if !value.is_object() {
            return Err(DecodeError::NotAnObject {
                found: json_type_name(&value),
            }
            .into());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Adds a field with its confidence.
    #[must_use]
    pub fn with_field(
        mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        confidence: f64,
    ) -> Self {
        let field = field.into();
        self.confidence.insert(field.clone(), Confidence::new(confidence));
        self.fields.insert(field, value.into());
        self
    }

    /// Adds a field without a confidence entry (read as zero).
    #[must_use]
    pub fn with_unscored_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Appends a provenance record.
    #[must_use]
    pub fn with_provenance(mut self, entry: ProvenanceEntry) -> Self {
        self.provenance.push(entry);
        self
    }

    /// Returns true if the result carries no fields.
    ///
    /// Confidence and provenance entries without a matching field are
    /// ignored by the merge, so they do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Confidence for `field`, or zero when the service sent none.
    #[must_use]
    pub fn confidence_for(&self, field: &str) -> Confidence {
        self.confidence.get(field).copied().unwrap_or(Confidence::ZERO)
    }

    /// First provenance record naming `field`, if any.
    #[must_use]
    pub fn provenance_for(&self, field: &str) -> Option<&ProvenanceEntry> {
        self.provenance.iter().find(|p| p.field == field)
    }

    /// Mean of all confidence entries, or `0.0` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overall_confidence(&self) -> f64 {
        if self.confidence.is_empty() {
            return 0.0;
        }
        let total: f64 = self.confidence.values().map(|c| c.value()).sum();
        total / self.confidence.len() as f64
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps every array element that decodes as a provenance record.
///
/// The LLM path sometimes emits bare strings ("short notes") in this list;
/// those carry no field name and are dropped.
fn deserialize_provenance<'de, D>(deserializer: D) -> Result<Vec<ProvenanceEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let result = ExtractionResult::from_json(
            r#"{
                "fields": {"income_annum": 900000, "education": "Graduate", "self_employed": "No"},
                "confidence": {"income_annum": 0.85, "education": 0.6},
                "provenance": [
                    {"field": "income_annum", "source_doc": "text", "method": "regex-annual", "snippet": "annual income 900000"},
                    {"field": "education", "source_doc": "text", "method": "keyword", "snippet": "graduate"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(result.fields.len(), 3);
        assert_eq!(result.fields["income_annum"], FieldValue::Int(900_000));
        assert_eq!(result.confidence_for("education"), Confidence::new(0.6));
        assert_eq!(result.confidence_for("self_employed"), Confidence::ZERO);
        assert_eq!(result.provenance.len(), 2);
    }

    #[test]
    fn test_decode_missing_and_null_parts() {
        let result = ExtractionResult::from_json("{}").unwrap();
        assert!(result.is_empty());
        assert!(result.confidence.is_empty());
        assert!(result.provenance.is_empty());

        let result =
            ExtractionResult::from_json(r#"{"fields": null, "confidence": null, "provenance": null}"#)
                .unwrap();
        assert_eq!(result, ExtractionResult::new());
    }

    #[test]
    fn test_decode_conf_alias() {
        let result =
            ExtractionResult::from_json(r#"{"fields": {"cibil_score": 782}, "conf": {"cibil_score": 0.8}}"#)
                .unwrap();
        assert_eq!(result.confidence_for("cibil_score"), Confidence::new(0.8));
    }

    #[test]
    fn test_decode_skips_note_strings_in_provenance() {
        let result = ExtractionResult::from_json(
            r#"{"fields": {"loan_term": 36}, "provenance": ["found tenure", {"field": "loan_term", "snippet": "36 months"}]}"#,
        )
        .unwrap();
        assert_eq!(result.provenance.len(), 1);
        assert_eq!(result.provenance[0].snippet, "36 months");
    }

    #[test]
    fn test_decode_keeps_record_with_null_snippet() {
        let result = ExtractionResult::from_json(
            r#"{"fields": {"education": "Graduate"}, "confidence": {"education": 0.6},
                "provenance": [{"field": "education", "source_doc": "cv.pdf", "page": 2, "method": "keyword", "snippet": null}]}"#,
        )
        .unwrap();
        assert_eq!(result.provenance.len(), 1);
        let entry = result.provenance_for("education").unwrap();
        assert!(entry.snippet.is_empty());
        assert_eq!(entry.locator.source_doc.as_deref(), Some("cv.pdf"));
        assert_eq!(entry.locator.page, Some(2));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = ExtractionResult::from_json("[1, 2]").unwrap_err();
        assert!(err.is_decode());
        assert!(format!("{err}").contains("array"));

        let err = ExtractionResult::from_json("not json").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_rejects_fields_not_object() {
        let err = ExtractionResult::from_json(r#"{"fields": [1, 2]}"#).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_provenance_for_returns_first_match() {
        let result = ExtractionResult::new()
            .with_field("income_annum", 900_000, 0.85)
            .with_provenance(ProvenanceEntry::new("income_annum", "first"))
            .with_provenance(ProvenanceEntry::new("income_annum", "second"));
        assert_eq!(result.provenance_for("income_annum").unwrap().snippet, "first");
        assert!(result.provenance_for("education").is_none());
    }

    #[test]
    fn test_overall_confidence() {
        assert!(ExtractionResult::new().overall_confidence().abs() < f64::EPSILON);

        let result = ExtractionResult::new()
            .with_field("a", 1, 0.8)
            .with_field("b", 2, 0.6)
            .with_unscored_field("c", 3);
        assert!((result.overall_confidence() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_extraction_source_display_and_serde() {
        assert_eq!(ExtractionSource::Pdf.to_string(), "pdf");
        let json = serde_json::to_string(&ExtractionSource::Text).unwrap();
        assert_eq!(json, "\"text\"");
    }
}
