//! Shared fixtures: an in-process streaming backend.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use livefact_client::transport::{ClaimChecker, HttpClaimChecker, WsConnector};
use livefact_client::{Session, SessionConfig, SessionHandle, spawn_session};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;

/// A one-connection WebSocket backend driven by the test.
pub struct StreamServer {
    pub url: String,
    frames: mpsc::UnboundedSender<String>,
    saw_close: Option<oneshot::Receiver<bool>>,
}

impl StreamServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws/audio", listener.local_addr().unwrap());
        let (frames, mut outgoing) = mpsc::unbounded_channel::<String>();
        let (close_tx, close_rx) = oneshot::channel();

        let _ = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(socket).await.unwrap();
            let (mut ws_tx, mut ws_rx) = ws.split();
            let mut saw_close = false;
            loop {
                tokio::select! {
                    frame = outgoing.recv() => match frame {
                        Some(text) => {
                            if ws_tx.send(Message::text(text)).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = ws_tx.close().await;
                            break;
                        }
                    },
                    msg = ws_rx.next() => match msg {
                        Some(Ok(msg)) if msg.is_close() => {
                            saw_close = true;
                            break;
                        }
                        Some(Ok(_)) => {}
                        _ => break,
                    },
                }
            }
            let _ = close_tx.send(saw_close);
        });

        Self {
            url,
            frames,
            saw_close: Some(close_rx),
        }
    }

    /// Push a text frame to the client.
    pub fn send(&self, payload: impl Into<String>) {
        let _ = self.frames.send(payload.into());
    }

    /// Wait until the connection ends; `true` when the client sent a close frame.
    pub async fn client_closed(&mut self) -> bool {
        let rx = self.saw_close.take().expect("already awaited");
        tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("connection still open")
            .unwrap_or(false)
    }
}

pub fn spawn_with(stream_url: &str, checker: Arc<dyn ClaimChecker>) -> SessionHandle {
    spawn_with_buffer(stream_url, checker, 16)
}

pub fn spawn_with_buffer(
    stream_url: &str,
    checker: Arc<dyn ClaimChecker>,
    event_buffer: usize,
) -> SessionHandle {
    let config = SessionConfig {
        stream_url: stream_url.to_owned(),
        event_buffer,
    };
    spawn_session(config, Arc::new(WsConnector::new(Duration::from_secs(5))), checker)
}

pub fn http_checker(base_url: &str) -> Arc<dyn ClaimChecker> {
    Arc::new(HttpClaimChecker::new(base_url, Duration::from_secs(5)).unwrap())
}

pub async fn wait(handle: &SessionHandle, predicate: impl FnMut(&Session) -> bool) -> Session {
    tokio::time::timeout(Duration::from_secs(5), handle.wait_for(predicate))
        .await
        .expect("timed out waiting for session state")
        .unwrap()
}
