//! Inbound message decoding.
//!
//! A streamed message is a JSON object with up to three optional top-level
//! fields: `transcript`, `results`, `error`. Each present field becomes one
//! [`InboundEvent`], emitted in that fixed order. A field with the wrong
//! shape is dropped on its own; the rest of the message still applies.
//! Nothing here is ever surfaced to the user: decode failures are logged.

use livefact_core::errors::DecodeError;
use livefact_core::fact::FactCheckResult;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// One semantic update extracted from a streamed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// Replace the transcript wholesale.
    TranscriptUpdate {
        /// Full current transcript.
        text: String,
    },
    /// Replace the result list wholesale.
    ResultsUpdate {
        /// Full current result set, in server order.
        results: Vec<FactCheckResult>,
    },
    /// The backend reported an error in-band.
    Error {
        /// Backend-provided message, shown verbatim.
        message: String,
    },
}

/// Outcome of decoding one raw message.
#[derive(Debug, Default)]
pub struct Decoded {
    /// Events in field order.
    pub events: Vec<InboundEvent>,
    /// Problems found along the way. Non-empty does not imply `events` is empty.
    pub errors: Vec<DecodeError>,
}

/// Decode a raw message, logging (never returning) any decode errors.
pub fn decode(raw: &str) -> Vec<InboundEvent> {
    let Decoded { events, errors } = decode_message(raw);
    for error in &errors {
        warn!(%error, len = raw.len(), "dropping malformed inbound payload");
    }
    events
}

/// Decode a raw message, returning events and errors separately.
pub fn decode_message(raw: &str) -> Decoded {
    let mut out = Decoded::default();

    let fields = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            out.errors.push(DecodeError::NotAnObject);
            return out;
        }
        Err(e) => {
            out.errors.push(DecodeError::InvalidJson(e));
            return out;
        }
    };

    collect(&mut out, transcript(&fields));
    collect(&mut out, results(fields.get("results")));
    collect(&mut out, error(&fields));
    out
}

fn collect(out: &mut Decoded, field: Result<Option<InboundEvent>, DecodeError>) {
    match field {
        Ok(Some(event)) => out.events.push(event),
        Ok(None) => {}
        Err(e) => out.errors.push(e),
    }
}

/// Non-empty string field, `None` when absent, `null` or empty.
fn text_field(fields: &Map<String, Value>, field: &'static str) -> Result<Option<String>, DecodeError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodeError::Field {
            field,
            reason: format!("expected string, got {}", type_name(other)),
        }),
    }
}

fn transcript(fields: &Map<String, Value>) -> Result<Option<InboundEvent>, DecodeError> {
    Ok(text_field(fields, "transcript")?.map(|text| InboundEvent::TranscriptUpdate { text }))
}

fn error(fields: &Map<String, Value>) -> Result<Option<InboundEvent>, DecodeError> {
    Ok(text_field(fields, "error")?.map(|message| InboundEvent::Error { message }))
}

// An empty array is a real update (the backend cleared its results).
fn results(value: Option<&Value>) -> Result<Option<InboundEvent>, DecodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let results = items
                .iter()
                .map(FactCheckResult::deserialize)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DecodeError::Field {
                    field: "results",
                    reason: e.to_string(),
                })?;
            Ok(Some(InboundEvent::ResultsUpdate { results }))
        }
        Some(other) => Err(DecodeError::Field {
            field: "results",
            reason: format!("expected array, got {}", type_name(other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use livefact_core::fact::{Citation, FactStatus};

    use super::*;

    #[test]
    fn results_with_true_status() {
        let events = decode(r#"{"results":[{"claim":"c","status":"true"}]}"#);
        assert_eq!(
            events,
            vec![InboundEvent::ResultsUpdate {
                results: vec![FactCheckResult::new("c", FactStatus::True)],
            }]
        );
    }

    #[test]
    fn unknown_status_is_uncertain() {
        let events = decode(r#"{"results":[{"claim":"c","status":"maybe"}]}"#);
        assert_matches!(
            events.as_slice(),
            [InboundEvent::ResultsUpdate { results }] if results[0].status == FactStatus::Uncertain
        );
    }

    #[test]
    fn unparsable_text_yields_nothing() {
        let decoded = decode_message("not json at all");
        assert!(decoded.events.is_empty());
        assert_matches!(decoded.errors.as_slice(), [DecodeError::InvalidJson(_)]);
        assert!(decode("{\"transcript\": ").is_empty());
    }

    #[test]
    fn non_object_top_level_yields_nothing() {
        let decoded = decode_message(r#"["transcript", "hello"]"#);
        assert!(decoded.events.is_empty());
        assert_matches!(decoded.errors.as_slice(), [DecodeError::NotAnObject]);
    }

    #[test]
    fn all_fields_in_fixed_order() {
        let events = decode(r#"{"error":"boom","results":[],"transcript":"hi"}"#);
        assert_eq!(
            events,
            vec![
                InboundEvent::TranscriptUpdate { text: "hi".into() },
                InboundEvent::ResultsUpdate { results: vec![] },
                InboundEvent::Error { message: "boom".into() },
            ]
        );
    }

    #[test]
    fn empty_and_null_fields_are_absent() {
        assert!(decode(r#"{"transcript":"","error":"","results":null}"#).is_empty());
        assert!(decode("{}").is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let events = decode(r#"{"transcript":"hello","speaker":"alice","v":2}"#);
        assert_eq!(events, vec![InboundEvent::TranscriptUpdate { text: "hello".into() }]);
    }

    #[test]
    fn malformed_field_does_not_poison_the_rest() {
        let decoded = decode_message(r#"{"transcript":"ok","results":[{"status":"true"}],"error":7}"#);
        assert_eq!(decoded.events, vec![InboundEvent::TranscriptUpdate { text: "ok".into() }]);
        assert_eq!(decoded.errors.len(), 2);
        assert_matches!(&decoded.errors[0], DecodeError::Field { field: "results", .. });
        assert_matches!(&decoded.errors[1], DecodeError::Field { field: "error", .. });
    }

    #[test]
    fn results_must_be_an_array() {
        let decoded = decode_message(r#"{"results":{"claim":"c"}}"#);
        assert!(decoded.events.is_empty());
        assert_eq!(
            decoded.errors[0].to_string(),
            "malformed `results` field: expected array, got object"
        );
    }

    #[test]
    fn citations_are_decoded() {
        let events = decode(
            r#"{"results":[{"claim":"X","status":"false","citations":[{"text":"src","url":"http://e.x"}]}]}"#,
        );
        let expected = FactCheckResult::new("X", FactStatus::False)
            .with_citation(Citation::with_url("src", "http://e.x"));
        assert_eq!(events, vec![InboundEvent::ResultsUpdate { results: vec![expected] }]);
    }
}
