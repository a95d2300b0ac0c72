//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so partial
//! JSON is accepted and missing fields keep their default value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "backend": { "streamUrl": "wss://facts.example/ws/audio" },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveFactSettings {
    /// Backend endpoints and network timeouts.
    pub backend: BackendSettings,
    /// Session actor tuning.
    pub session: SessionSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl LiveFactSettings {
    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let stream = &self.backend.stream_url;
        if !(stream.starts_with("ws://") || stream.starts_with("wss://")) {
            return Err(SettingsError::InvalidValue(format!(
                "streamUrl must use ws:// or wss://, got {stream}"
            )));
        }
        let api = &self.backend.api_url;
        if !(api.starts_with("http://") || api.starts_with("https://")) {
            return Err(SettingsError::InvalidValue(format!(
                "apiUrl must use http:// or https://, got {api}"
            )));
        }
        if self.session.event_buffer == 0 {
            return Err(SettingsError::InvalidValue(
                "session.eventBuffer must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Where the fact-check backend lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendSettings {
    /// WebSocket endpoint streaming transcript and result updates.
    pub stream_url: String,
    /// Base URL of the HTTP API (`/fact-check`, `/health`).
    pub api_url: String,
    /// WebSocket handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-request timeout for HTTP calls in milliseconds.
    pub request_timeout_ms: u64,
}

impl BackendSettings {
    /// Handshake timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            stream_url: "ws://localhost:8000/ws/audio".to_string(),
            api_url: "http://localhost:8000".to_string(),
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// Session actor tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Capacity of the ordered action channel feeding the session actor.
    pub event_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { event_buffer: 256 }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
