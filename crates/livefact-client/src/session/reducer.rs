//! Pure transition function over [`Session`] snapshots.
//!
//! `reduce` never performs I/O. Anything that must touch the outside world
//! is returned as an [`Effect`] for the actor to execute.

use livefact_core::errors::{ClaimError, LiveFactError};
use livefact_core::fact::FactCheckResult;
use tracing::{debug, info};

use super::state::{ClaimTicket, ConnectionState, Session};
use super::submitter;
use crate::decoder::{self, InboundEvent};
use crate::transport::{ConnectionEpoch, TransportEvent};

/// Everything that can change a session, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// User wants to listen.
    Start,
    /// User stopped listening: reset and release the connection.
    Stop,
    /// Release the connection, keeping the view model.
    Close,
    /// Manual claim check.
    SubmitManual {
        /// Claim text as typed.
        claim: String,
    },
    /// Event from the connection attempt `epoch`.
    Transport {
        /// Which attempt produced it.
        epoch: ConnectionEpoch,
        /// What happened.
        event: TransportEvent,
    },
    /// A manual check finished.
    ClaimSettled {
        /// Which submission this answers.
        ticket: ClaimTicket,
        /// Verdict or failure.
        outcome: Result<FactCheckResult, ClaimError>,
    },
}

/// Side effects requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Open a streaming connection for `epoch`, replacing any existing one.
    OpenTransport {
        /// Attempt identifier to tag its events with.
        epoch: ConnectionEpoch,
    },
    /// Release the current streaming connection.
    CloseTransport,
    /// Send a manual claim check.
    SubmitClaim {
        /// Ticket the completion must carry.
        ticket: ClaimTicket,
        /// Claim text, sent verbatim.
        claim: String,
    },
}

/// Next snapshot plus the effects to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The new snapshot (same revision when nothing changed).
    pub session: Session,
    /// Effects, in execution order.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Whether the snapshot differs from the one it was computed from.
    pub fn changed_from(&self, previous: &Session) -> bool {
        self.session.revision != previous.revision
    }
}

/// Fold one action into `session`.
pub fn reduce(session: &Session, action: Action) -> Transition {
    let mut next = session.clone();
    let mut effects = Vec::new();

    match action {
        Action::Start => start(&mut next, &mut effects),
        Action::Stop => stop(&mut next, &mut effects),
        Action::Close => release(&mut next, &mut effects),
        Action::SubmitManual { claim } => submit(&mut next, &mut effects, claim),
        Action::Transport { epoch, event } => transport(&mut next, epoch, event),
        Action::ClaimSettled { ticket, outcome } => settle(&mut next, ticket, outcome),
    }

    if next != *session {
        next.revision = session.revision + 1;
    }
    Transition {
        session: next,
        effects,
    }
}

fn start(s: &mut Session, effects: &mut Vec<Effect>) {
    s.listening = true;
    if s.connection.needs_connect() {
        let epoch = s.next_epoch();
        info!(%epoch, from = ?s.connection, "opening stream");
        s.connection = ConnectionState::Connecting;
        s.live_epoch = Some(epoch);
        effects.push(Effect::OpenTransport { epoch });
    }
}

fn stop(s: &mut Session, effects: &mut Vec<Effect>) {
    s.listening = false;
    s.transcript.clear();
    s.results.clear();
    s.pending_claim = None;
    release(s, effects);
}

fn release(s: &mut Session, effects: &mut Vec<Effect>) {
    if s.live_epoch.take().is_some() {
        effects.push(Effect::CloseTransport);
    }
    if matches!(s.connection, ConnectionState::Connecting | ConnectionState::Connected) {
        s.connection = ConnectionState::Closed;
    }
}

fn submit(s: &mut Session, effects: &mut Vec<Effect>, claim: String) {
    if let Err(e) = submitter::validate_claim(&claim) {
        debug!(error = %e, "ignoring manual claim");
        return;
    }
    let ticket = s.next_ticket();
    s.pending_claim = Some(ticket);
    effects.push(Effect::SubmitClaim { ticket, claim });
}

fn transport(s: &mut Session, epoch: ConnectionEpoch, event: TransportEvent) {
    if s.live_epoch != Some(epoch) {
        debug!(%epoch, live = ?s.live_epoch, "dropping event from stale connection");
        return;
    }
    match event {
        TransportEvent::Opened => {
            s.connection = ConnectionState::Connected;
            s.last_error = None;
        }
        TransportEvent::Message(raw) => {
            for event in decoder::decode(&raw) {
                apply_inbound(s, event);
            }
        }
        TransportEvent::Error(e) => {
            s.connection = ConnectionState::Error;
            surface(s, e.into());
        }
        TransportEvent::Closed => {
            // A preceding error stays visible.
            if s.connection != ConnectionState::Error {
                s.connection = ConnectionState::Closed;
            }
            s.live_epoch = None;
        }
    }
}

/// Every update replaces its field wholesale.
fn apply_inbound(s: &mut Session, event: InboundEvent) {
    match event {
        InboundEvent::TranscriptUpdate { text } => s.transcript = text,
        InboundEvent::ResultsUpdate { results } => s.results = results,
        InboundEvent::Error { message } => surface(s, LiveFactError::Backend(message)),
    }
}

fn settle(s: &mut Session, ticket: ClaimTicket, outcome: Result<FactCheckResult, ClaimError>) {
    if s.pending_claim != Some(ticket) {
        debug!(?ticket, pending = ?s.pending_claim, "discarding superseded claim result");
        return;
    }
    s.pending_claim = None;
    match outcome {
        Ok(result) => s.results = vec![result],
        Err(e) => surface(s, e.into()),
    }
}

/// Show `error` in the banner, replacing any earlier one.
fn surface(s: &mut Session, error: LiveFactError) {
    debug!(kind = error.error_kind(), %error, "surfacing error");
    if let Some(banner) = error.banner() {
        s.last_error = Some(banner);
    }
}
