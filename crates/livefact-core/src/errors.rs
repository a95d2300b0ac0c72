//! Error hierarchy for the LiveFact client.
//!
//! - [`TransportError`]: streaming connection could not be established or dropped
//! - [`DecodeError`]: malformed inbound payload (logged, never surfaced)
//! - [`ClaimError`]: manual claim check failed
//! - [`LiveFactError`]: umbrella enum, plus the backend/validation categories
//! - [`SessionError`]: a command could not reach the session actor
//!
//! Every user-visible error ends up as a single banner string
//! ([`LiveFactError::banner`]); the latest one overwrites any earlier one.

use thiserror::Error;

/// Banner shown when the claim-check endpoint answers with a failure.
pub const CHECK_FAILED_BANNER: &str = "Error checking claim";

/// Streaming transport failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("cannot reach backend at {url}: {reason}")]
    Unreachable {
        /// Endpoint that was dialled.
        url: String,
        /// Underlying cause.
        reason: String,
    },
    /// The handshake did not complete in time.
    #[error("cannot reach backend at {url}: timed out after {timeout_ms}ms")]
    Timeout {
        /// Endpoint that was dialled.
        url: String,
        /// Configured connect timeout.
        timeout_ms: u64,
    },
    /// An established connection failed mid-stream.
    #[error("connection to backend lost: {0}")]
    Dropped(String),
}

/// Inbound payload could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not valid JSON.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Valid JSON, but the top level is not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
    /// A recognised field had the wrong shape.
    #[error("malformed `{field}` field: {reason}")]
    Field {
        /// Top-level field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// A binary frame that is not UTF-8 text.
    #[error("binary frame is not valid UTF-8")]
    Binary,
}

/// Manual claim-check failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-success status.
    #[error("fact-check request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// A success response whose body was not a fact-check result.
    #[error("invalid fact-check response: {0}")]
    Body(String),
}

/// Session handle failures.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session actor has shut down.
    #[error("session has shut down")]
    Closed,
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum LiveFactError {
    /// Streaming transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Malformed inbound payload.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Manual claim check failed.
    #[error(transparent)]
    Claim(#[from] ClaimError),
    /// The backend reported an error in-band.
    #[error("backend error: {0}")]
    Backend(String),
    /// Input rejected before any I/O.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl LiveFactError {
    /// Text for the error banner, or `None` for errors that are only logged.
    pub fn banner(&self) -> Option<String> {
        match self {
            Self::Transport(e) => Some(e.to_string()),
            Self::Claim(ClaimError::Network(cause)) => Some(format!("Network error: {cause}")),
            Self::Claim(ClaimError::Status { .. } | ClaimError::Body(_)) => {
                Some(CHECK_FAILED_BANNER.to_string())
            }
            Self::Backend(message) => Some(message.clone()),
            Self::Decode(_) | Self::Validation(_) => None,
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Claim(_) => "claim",
            Self::Backend(_) => "backend",
            Self::Validation(_) => "validation",
        }
    }
}
