//! Transport layer: one streaming connection plus one request/response channel.
//!
//! The streaming side never reports through return values. A connector spawns
//! the connection and every lifecycle step arrives as a [`TransportEvent`]
//! through the session's [`EventSink`], tagged with the [`ConnectionEpoch`] of
//! the attempt that produced it.
//!
//! The socket is owned by exactly one [`ConnectionHandle`]; closing or
//! dropping the handle releases it.

pub mod http;
pub mod websocket;

use std::fmt;

use livefact_core::errors::TransportError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::session::Action;

pub use http::{ClaimChecker, HttpClaimChecker};
pub use websocket::WsConnector;

/// Identifies one connection attempt. Strictly increasing per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionEpoch(pub u64);

impl fmt::Display for ConnectionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle and data events reported by a streaming connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened,
    /// A text payload arrived (undecoded).
    Message(String),
    /// The connection failed; always followed by [`TransportEvent::Closed`].
    Error(TransportError),
    /// The connection is gone.
    Closed,
}

/// Delivers transport events into the session's ordered event channel.
#[derive(Clone, Debug)]
pub struct EventSink {
    epoch: ConnectionEpoch,
    tx: mpsc::Sender<Action>,
}

impl EventSink {
    /// Sink for the connection attempt `epoch`.
    pub fn new(epoch: ConnectionEpoch, tx: mpsc::Sender<Action>) -> Self {
        Self { epoch, tx }
    }

    /// The attempt this sink reports for.
    pub fn epoch(&self) -> ConnectionEpoch {
        self.epoch
    }

    /// Deliver an event. Returns `false` once the session is gone.
    pub async fn emit(&self, event: TransportEvent) -> bool {
        self.tx
            .send(Action::Transport {
                epoch: self.epoch,
                event,
            })
            .await
            .is_ok()
    }
}

/// Exclusive owner of one streaming connection.
///
/// [`close`](Self::close) is idempotent; `Drop` closes as well, so the socket
/// is released on every exit path.
#[derive(Debug)]
pub struct ConnectionHandle {
    epoch: ConnectionEpoch,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConnectionHandle {
    /// Wrap a spawned connection task.
    pub fn new(epoch: ConnectionEpoch, cancel: CancellationToken, task: Option<JoinHandle<()>>) -> Self {
        Self { epoch, cancel, task }
    }

    /// The attempt this handle owns.
    pub fn epoch(&self) -> ConnectionEpoch {
        self.epoch
    }

    /// Ask the connection to shut down. Safe to call repeatedly.
    pub fn close(&mut self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(epoch = %self.epoch, "releasing stream connection");
            self.cancel.cancel();
        }
    }

    /// Whether [`close`](Self::close) has been requested.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Close and wait for the connection task to finish.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens streaming connections.
///
/// `connect` must not fail synchronously: connect failures are reported as
/// [`TransportEvent::Error`] followed by [`TransportEvent::Closed`] through
/// `sink`. Must be called from within a Tokio runtime.
pub trait StreamConnector: Send + Sync {
    /// Start connecting to `url`, reporting through `sink`.
    fn connect(&self, url: &str, sink: EventSink) -> ConnectionHandle;
}
