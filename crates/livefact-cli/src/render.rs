//! Plain-text rendering of session snapshots and check results.

use std::fmt::Write as _;

use livefact_client::Session;
use livefact_core::fact::FactCheckResult;

/// One result: status label, claim, then citations one per line.
pub fn result(result: &FactCheckResult) -> String {
    let mut out = format!("[{}] {}", result.status.label(), result.claim);
    for citation in &result.citations {
        let _ = match &citation.url {
            Some(url) => write!(out, "\n    - {} (Source: {url})", citation.text),
            None => write!(out, "\n    - {}", citation.text),
        };
    }
    out
}

/// Full snapshot, as printed by `livefact listen` on every change.
pub fn session(session: &Session) -> String {
    let mut out = format!("── {} ──", session.phase());
    if let Some(error) = session.last_error() {
        let _ = write!(out, "\nError: {error}");
    }
    if !session.transcript().is_empty() {
        let _ = write!(out, "\nTranscript: {}", session.transcript());
    }
    if session.results().is_empty() {
        out.push_str("\nNo claims checked yet.");
    } else {
        for r in session.results() {
            let _ = write!(out, "\n  {}", result(r).replace('\n', "\n  "));
        }
    }
    out
}
