//! Provenance entries: the source text that justified an extracted value.
//!
//! The provenance is what the user sees in a field's tooltip when deciding
//! whether to trust an auto-filled value.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Where inside the submitted material a snippet was found.
///
/// Every part is optional; the text path usually carries only a
/// `source_doc`, the PDF path may add a page number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocator {
    /// Document name (uploaded file name, or `"text"` for pasted input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_doc: Option<String>,

    /// 1-based page number within the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Extraction method label reported by the service (`"regex"`, `"keyword"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl SourceLocator {
    /// Returns true if no part of the locator is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.source_doc.is_none() && self.page.is_none() && self.method.is_none()
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source_doc, self.page) {
            (Some(doc), Some(page)) => write!(f, "{doc} p.{page}"),
            (Some(doc), None) => write!(f, "{doc}"),
            (None, Some(page)) => write!(f, "p.{page}"),
            (None, None) => write!(f, "unknown"),
        }
    }
}

/// One provenance record from an extraction result.
///
/// Locator parts are flattened, so the wire shape is
/// `{"field": .., "snippet": .., "source_doc": .., "page": .., "method": ..}`.
///
/// # Examples
///
/// ```
/// use loan_prefill::ProvenanceEntry;
///
/// let entry = ProvenanceEntry::new("cibil_score", "cibil score: 782")
///     .with_source_doc("statement.pdf")
///     .with_page(2);
/// assert_eq!(entry.locator.to_string(), "statement.pdf p.2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    /// Name of the field this entry justifies.
    pub field: String,

    /// Source text the value was read from. A `null` snippet decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,

    #[serde(flatten)]
    pub locator: SourceLocator,
}

impl ProvenanceEntry {
    /// Creates an entry with no locator.
    #[must_use]
    pub fn new(field: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            snippet: snippet.into(),
            locator: SourceLocator::default(),
        }
    }

    #[must_use]
    pub fn with_source_doc(mut self, source_doc: impl Into<String>) -> Self {
        self.locator.source_doc = Some(source_doc.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.locator.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.locator.method = Some(method.into());
        self
    }

    /// Returns the snippet cut to at most `max_chars` characters.
    ///
    /// A cut snippet ends with `…`, which counts toward the limit.
    #[must_use]
    pub fn truncated_snippet(&self, max_chars: usize) -> String {
        let snippet = self.snippet.trim();
        if snippet.chars().count() <= max_chars {
            return snippet.to_string();
        }
        let keep = max_chars.saturating_sub(1);
        let mut out: String = snippet.chars().take(keep).collect();
        out.push('…');
        out
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_flat_locator() {
        let entry: ProvenanceEntry = serde_json::from_str(
            r#"{"field": "income_annum", "source_doc": "payslip.pdf", "page": 1, "method": "regex-annual", "snippet": "annual income: 9,00,000"}"#,
        )
        .unwrap();
        assert_eq!(entry.field, "income_annum");
        assert_eq!(entry.snippet, "annual income: 9,00,000");
        assert_eq!(entry.locator.source_doc.as_deref(), Some("payslip.pdf"));
        assert_eq!(entry.locator.page, Some(1));
        assert_eq!(entry.locator.method.as_deref(), Some("regex-annual"));
    }

    #[test]
    fn test_deserialize_minimal_entry() {
        let entry: ProvenanceEntry = serde_json::from_str(r#"{"field": "education"}"#).unwrap();
        assert!(entry.snippet.is_empty());
        assert!(entry.locator.is_empty());
    }

    #[test]
    fn test_deserialize_null_snippet_keeps_locator() {
        let entry: ProvenanceEntry = serde_json::from_str(
            r#"{"field": "education", "source_doc": "cv.pdf", "page": 2, "method": "keyword", "snippet": null}"#,
        )
        .unwrap();
        assert!(entry.snippet.is_empty());
        assert_eq!(entry.locator.to_string(), "cv.pdf p.2");
        assert_eq!(entry.locator.method.as_deref(), Some("keyword"));
    }

    #[test]
    fn test_serialize_skips_absent_locator_parts() {
        let entry = ProvenanceEntry::new("loan_term", "tenure 36 months");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"field": "loan_term", "snippet": "tenure 36 months"}));
    }

    #[test]
    fn test_truncated_snippet() {
        let entry = ProvenanceEntry::new("f", "abcdefghij");
        assert_eq!(entry.truncated_snippet(20), "abcdefghij");
        assert_eq!(entry.truncated_snippet(10), "abcdefghij");
        assert_eq!(entry.truncated_snippet(5), "abcd…");
        assert_eq!(entry.truncated_snippet(5).chars().count(), 5);
    }

    #[test]
    fn test_truncated_snippet_multibyte() {
        let entry = ProvenanceEntry::new("f", "₹₹₹₹₹₹");
        assert_eq!(entry.truncated_snippet(3), "₹₹…");
    }

    #[test]
    fn test_locator_display() {
        let entry = ProvenanceEntry::new("f", "s").with_source_doc("text");
        assert_eq!(entry.locator.to_string(), "text");
        let entry = ProvenanceEntry::new("f", "s").with_page(4);
        assert_eq!(entry.locator.to_string(), "p.4");
        assert_eq!(SourceLocator::default().to_string(), "unknown");
    }
}
