//! Manual claim submission.
//!
//! Checks run on their own task so a slow backend never stalls streamed
//! updates. Completions re-enter the session as [`Action::ClaimSettled`].

use std::sync::Arc;

use livefact_core::errors::LiveFactError;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info_span, warn};

use super::reducer::Action;
use super::state::ClaimTicket;
use crate::transport::ClaimChecker;

/// Reject claims that are empty after trimming whitespace.
pub fn validate_claim(claim: &str) -> Result<(), LiveFactError> {
    if claim.trim().is_empty() {
        return Err(LiveFactError::Validation("claim is empty".into()));
    }
    Ok(())
}

/// Runs claim checks and reports their outcome to the session.
#[derive(Clone)]
pub(crate) struct ClaimSubmitter {
    checker: Arc<dyn ClaimChecker>,
    tx: mpsc::Sender<Action>,
}

impl ClaimSubmitter {
    pub(crate) fn new(checker: Arc<dyn ClaimChecker>, tx: mpsc::Sender<Action>) -> Self {
        Self { checker, tx }
    }

    /// Spawn the check for `claim`. The claim is sent verbatim, untrimmed.
    pub(crate) fn submit(&self, ticket: ClaimTicket, claim: String) {
        let checker = Arc::clone(&self.checker);
        let tx = self.tx.clone();
        let span = info_span!("claim_check", ticket = ticket.0);
        let _ = tokio::spawn(
            async move {
                let outcome = checker.check(&claim).await;
                match &outcome {
                    Ok(result) => debug!(status = %result.status, "claim checked"),
                    Err(error) => warn!(%error, "claim check failed"),
                }
                if tx.send(Action::ClaimSettled { ticket, outcome }).await.is_err() {
                    debug!("session gone before claim settled");
                }
            }
            .instrument(span),
        );
    }
}
