//! # livefact-settings
//!
//! Configuration management with layered sources for the LiveFact client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`LiveFactSettings::default()`]
//! 2. **User file**: `~/.livefact/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `LIVEFACT_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = LiveFactSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = LiveFactSettings::default();
        assert_eq!(settings.backend.stream_url, "ws://localhost:8000/ws/audio");
        assert_eq!(settings.backend.api_url, "http://localhost:8000");
        assert_eq!(settings.backend.connect_timeout_ms, 10_000);
        assert_eq!(settings.backend.request_timeout_ms, 30_000);
        assert_eq!(settings.session.event_buffer, 256);
        assert_eq!(settings.logging.level, "warn");
        settings.validate().unwrap();
    }
}
