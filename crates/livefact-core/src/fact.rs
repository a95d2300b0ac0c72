//! Fact-check result types shared by the streaming and manual-check paths.
//!
//! Decoding is deliberately lenient at the leaves: the backend's `status`
//! vocabulary is open-ended and citations are loosely shaped, so anything
//! unrecognised collapses to a well-defined default instead of failing the
//! whole result.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Verdict attached to a checked claim.
///
/// Only the exact wire strings `"true"` and `"false"` are recognised. Any
/// other string, any non-string value, `null`, or a missing field decodes
/// as [`FactStatus::Uncertain`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FactStatus {
    /// The claim was verified.
    True,
    /// The claim was refuted.
    False,
    /// Anything else.
    #[default]
    Uncertain,
}

impl FactStatus {
    /// Map a raw wire value onto a status.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("true") => Self::True,
            Some("false") => Self::False,
            _ => Self::Uncertain,
        }
    }

    /// The backend's spelling of this status.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Uncertain => "uncertain",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl fmt::Display for FactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FactStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for FactStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_wire(value.as_str()))
    }
}

/// A source backing (or contradicting) a claim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Quoted or summarised source text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Link to the source, when the backend provided a non-empty one.
    #[serde(
        default,
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
}

impl Citation {
    /// Citation with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    /// Citation with text and a source link.
    pub fn with_url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }
}

/// One checked claim. Immutable once decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    /// The natural-language statement that was checked.
    pub claim: String,
    /// The verdict.
    #[serde(default)]
    pub status: FactStatus,
    /// Supporting sources, in backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: Vec<Citation>,
}

impl FactCheckResult {
    /// Result without citations.
    pub fn new(claim: impl Into<String>, status: FactStatus) -> Self {
        Self {
            claim: claim.into(),
            status,
            citations: Vec::new(),
        }
    }

    /// Append a citation (builder style).
    #[must_use]
    pub fn with_citation(mut self, citation: Citation) -> Self {
        self.citations.push(citation);
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> FactCheckResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn status_exact_literals() {
        assert_eq!(FactStatus::from_wire(Some("true")), FactStatus::True);
        assert_eq!(FactStatus::from_wire(Some("false")), FactStatus::False);
        assert_eq!(FactStatus::from_wire(Some("True")), FactStatus::Uncertain);
        assert_eq!(FactStatus::from_wire(Some("maybe")), FactStatus::Uncertain);
        assert_eq!(FactStatus::from_wire(None), FactStatus::Uncertain);
    }

    #[test]
    fn status_non_string_values_are_uncertain() {
        let r = parse(json!({"claim": "c", "status": true}));
        assert_eq!(r.status, FactStatus::Uncertain);
        let r = parse(json!({"claim": "c", "status": null}));
        assert_eq!(r.status, FactStatus::Uncertain);
        let r = parse(json!({"claim": "c"}));
        assert_eq!(r.status, FactStatus::Uncertain);
    }

    #[test]
    fn full_result_decodes() {
        let r = parse(json!({
            "claim": "X",
            "status": "false",
            "citations": [{"text": "src", "url": "http://e.x"}]
        }));
        assert_eq!(
            r,
            FactCheckResult::new("X", FactStatus::False)
                .with_citation(Citation::with_url("src", "http://e.x"))
        );
    }

    #[test]
    fn citations_tolerate_null_and_missing_parts() {
        let r = parse(json!({"claim": "c", "status": "true", "citations": null}));
        assert!(r.citations.is_empty());

        let r = parse(json!({"claim": "c", "citations": [{"url": ""}, {"text": "t", "url": null}]}));
        assert_eq!(r.citations, vec![Citation::new(""), Citation::new("t")]);
    }

    #[test]
    fn missing_claim_is_rejected() {
        let err = serde_json::from_value::<FactCheckResult>(json!({"status": "true"}));
        assert!(err.is_err());
    }

    #[test]
    fn serializes_in_backend_vocabulary() {
        let r = FactCheckResult::new("c", FactStatus::Uncertain).with_citation(Citation::new("t"));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, json!({"claim": "c", "status": "uncertain", "citations": [{"text": "t"}]}));
    }

    #[test]
    fn labels() {
        assert_eq!(FactStatus::True.to_string(), "True");
        assert_eq!(FactStatus::False.label(), "False");
        assert_eq!(FactStatus::Uncertain.label(), "Uncertain");
    }
}
