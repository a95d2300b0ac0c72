//! The session snapshot.
//!
//! [`Session`] is a plain value: observers receive whole clones of it and
//! it only ever changes through [`reduce`](super::reduce).

use std::fmt;

use livefact_core::fact::FactCheckResult;

use crate::transport::ConnectionEpoch;

/// Streaming connection lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Nothing attempted yet.
    #[default]
    Idle,
    /// Handshake in progress.
    Connecting,
    /// Transport is open.
    Connected,
    /// The last attempt failed or dropped.
    Error,
    /// Closed normally (by either side).
    Closed,
}

impl ConnectionState {
    /// `Error` and `Closed` end an attempt; `start` may begin a new one.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Error | Self::Closed)
    }

    /// Whether `start` needs to open a new connection from this state.
    pub fn needs_connect(self) -> bool {
        matches!(self, Self::Idle | Self::Error | Self::Closed)
    }
}

/// Combined view of connection state and listening intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Nothing attempted yet.
    Idle,
    /// Handshake in progress.
    Connecting,
    /// Open, but the user is not listening.
    Connected,
    /// Open and listening.
    Listening,
    /// Closed normally.
    Closed,
    /// Failed or dropped.
    Error,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Listening => "listening",
            Self::Closed => "closed",
            Self::Error => "error",
        })
    }
}

/// Ticket identifying one manual claim submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimTicket(pub u64);

/// One live fact-checking interaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub(super) connection: ConnectionState,
    pub(super) listening: bool,
    pub(super) transcript: String,
    pub(super) results: Vec<FactCheckResult>,
    pub(super) last_error: Option<String>,
    /// Epoch of the connection whose events are accepted.
    pub(super) live_epoch: Option<ConnectionEpoch>,
    pub(super) epochs_issued: u64,
    /// Only the most recent submission may settle.
    pub(super) pending_claim: Option<ClaimTicket>,
    pub(super) tickets_issued: u64,
    pub(super) revision: u64,
}

impl Session {
    /// Fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Streaming connection state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Whether the user asked to listen.
    pub fn listening(&self) -> bool {
        self.listening
    }

    /// Latest transcript (empty when none).
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Current result set, in server-delivery order.
    pub fn results(&self) -> &[FactCheckResult] {
        &self.results
    }

    /// Error banner, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a manual check is in flight.
    pub fn claim_pending(&self) -> bool {
        self.pending_claim.is_some()
    }

    /// Incremented on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Epoch of the connection currently owned, if any.
    pub fn live_epoch(&self) -> Option<ConnectionEpoch> {
        self.live_epoch
    }

    /// Projected lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        match self.connection {
            ConnectionState::Idle => SessionPhase::Idle,
            ConnectionState::Connecting => SessionPhase::Connecting,
            ConnectionState::Connected if self.listening => SessionPhase::Listening,
            ConnectionState::Connected => SessionPhase::Connected,
            ConnectionState::Error => SessionPhase::Error,
            ConnectionState::Closed => SessionPhase::Closed,
        }
    }

    pub(super) fn next_epoch(&mut self) -> ConnectionEpoch {
        self.epochs_issued += 1;
        ConnectionEpoch(self.epochs_issued)
    }

    pub(super) fn next_ticket(&mut self) -> ClaimTicket {
        self.tickets_issued += 1;
        ClaimTicket(self.tickets_issued)
    }
}
