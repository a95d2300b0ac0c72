//! WebSocket stream connector: a thin client over `tokio-tungstenite`.
//!
//! The connection runs in its own task. Inbound text frames are forwarded
//! as [`TransportEvent::Message`]; the core never writes application data
//! (audio goes out-of-band), only the closing handshake.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use livefact_core::errors::{DecodeError, TransportError};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ConnectionHandle, EventSink, StreamConnector, TransportEvent};

/// Connects to the streaming endpoint over WebSocket.
#[derive(Clone, Debug)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl WsConnector {
    /// Connector giving up on the handshake after `connect_timeout`.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl StreamConnector for WsConnector {
    fn connect(&self, url: &str, sink: EventSink) -> ConnectionHandle {
        let cancel = CancellationToken::new();
        let epoch = sink.epoch();
        let task = tokio::spawn(run_connection(
            url.to_owned(),
            self.connect_timeout,
            sink,
            cancel.clone(),
        ));
        ConnectionHandle::new(epoch, cancel, Some(task))
    }
}

async fn run_connection(url: String, timeout: Duration, sink: EventSink, cancel: CancellationToken) {
    let epoch = sink.epoch();
    debug!(%url, %epoch, "connecting stream");

    let attempt = tokio::time::timeout(timeout, connect_async(url.as_str()));
    let ws = tokio::select! {
        () = cancel.cancelled() => {
            debug!(%epoch, "connect abandoned");
            return;
        }
        res = attempt => match res {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => {
                fail(&sink, &cancel, TransportError::Unreachable { url, reason: e.to_string() }).await;
                return;
            }
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                fail(&sink, &cancel, TransportError::Timeout { url, timeout_ms }).await;
                return;
            }
        }
    };

    info!(%url, %epoch, "stream connected");
    if !emit_unless_cancelled(&sink, &cancel, TransportEvent::Opened).await {
        return;
    }

    let (mut ws_tx, mut ws_rx) = ws.split();
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                // Sends the close frame.
                let _ = ws_tx.close().await;
                debug!(%epoch, "stream closed locally");
                return;
            }
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !emit_unless_cancelled(&sink, &cancel, TransportEvent::Message(text.to_string())).await {
                        let _ = ws_tx.close().await;
                        return;
                    }
                }
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => {
                        if !emit_unless_cancelled(&sink, &cancel, TransportEvent::Message(text)).await {
                            let _ = ws_tx.close().await;
                            return;
                        }
                    }
                    Err(_) => warn!(error = %DecodeError::Binary, len = bytes.len(), "dropping binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(%epoch, ?frame, "server closed stream");
                    break;
                }
                // Ping replies are queued by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(%epoch, error = %e, "stream failed");
                    let error = TransportEvent::Error(TransportError::Dropped(e.to_string()));
                    let _ = emit_unless_cancelled(&sink, &cancel, error).await;
                    break;
                }
                None => break,
            }
        }
    }

    let _ = emit_unless_cancelled(&sink, &cancel, TransportEvent::Closed).await;
}

/// Deliver `event` unless the connection is released first; `false` means stop.
async fn emit_unless_cancelled(sink: &EventSink, cancel: &CancellationToken, event: TransportEvent) -> bool {
    tokio::select! {
        () = cancel.cancelled() => {
            debug!(epoch = %sink.epoch(), "released while delivering event");
            false
        }
        delivered = sink.emit(event) => delivered,
    }
}

async fn fail(sink: &EventSink, cancel: &CancellationToken, error: TransportError) {
    warn!(epoch = %sink.epoch(), %error, "stream connect failed");
    if emit_unless_cancelled(sink, cancel, TransportEvent::Error(error)).await {
        let _ = emit_unless_cancelled(sink, cancel, TransportEvent::Closed).await;
    }
}
