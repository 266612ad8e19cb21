//! Bridge settings and environment overrides.
//!
//! Settings are pure data. Reading the process environment goes through
//! `SettingsSource` so tests can feed a map instead.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable enabling diagnostic traces in error events.
pub const DEBUG_ENV: &str = "SPOTDL_DEBUG";
/// Environment variable overriding the `spotdl` program.
pub const SPOTDL_ENV: &str = "SPOTBRIDGE_SPOTDL";
/// Environment variable overriding the `yt-dlp` program.
pub const YTDLP_ENV: &str = "SPOTBRIDGE_YTDLP";
/// Environment variable overriding the `ffmpeg` program.
pub const FFMPEG_ENV: &str = "SPOTBRIDGE_FFMPEG";

/// Grace period between SIGTERM and SIGKILL on cancel.
pub const DEFAULT_CANCEL_GRACE: Duration = Duration::from_secs(5);
/// Timeout for `--version` probes.
pub const DEFAULT_VERSION_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for metadata lookups over HTTP.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors reading settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{var} is set but empty")]
    EmptyOverride { var: &'static str },
}

/// Key/value lookup used to build settings.
pub trait SettingsSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SettingsSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Runtime settings for both strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Emit full cause chains in error events.
    pub debug_traces: bool,
    /// `spotdl` program name or path.
    pub spotdl_program: PathBuf,
    /// `yt-dlp` program name or path.
    pub ytdlp_program: PathBuf,
    /// `ffmpeg` program name or path.
    pub ffmpeg_program: PathBuf,
    /// Wait after SIGTERM before killing the child.
    pub cancel_grace: Duration,
    /// Timeout for version probes.
    pub version_timeout: Duration,
    /// Timeout for metadata lookups.
    pub metadata_timeout: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BridgeSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            debug_traces: false,
            spotdl_program: PathBuf::from("spotdl"),
            ytdlp_program: PathBuf::from("yt-dlp"),
            ffmpeg_program: PathBuf::from("ffmpeg"),
            cancel_grace: DEFAULT_CANCEL_GRACE,
            version_timeout: DEFAULT_VERSION_TIMEOUT,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_source(&ProcessEnv)
    }

    /// Defaults overridden by `source`.
    pub fn from_source(source: &dyn SettingsSource) -> Result<Self, SettingsError> {
        let mut settings = Self::with_defaults();

        settings.debug_traces = source
            .get(DEBUG_ENV)
            .is_some_and(|value| value.trim() == "1");

        if let Some(path) = program_override(source, SPOTDL_ENV)? {
            settings.spotdl_program = path;
        }
        if let Some(path) = program_override(source, YTDLP_ENV)? {
            settings.ytdlp_program = path;
        }
        if let Some(path) = program_override(source, FFMPEG_ENV)? {
            settings.ffmpeg_program = path;
        }

        Ok(settings)
    }

    /// Set the `spotdl` program.
    #[must_use]
    pub fn with_spotdl_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.spotdl_program = program.into();
        self
    }

    /// Set the `yt-dlp` program.
    #[must_use]
    pub fn with_ytdlp_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.ytdlp_program = program.into();
        self
    }

    /// Set whether diagnostic traces are emitted.
    #[must_use]
    pub const fn with_debug_traces(mut self, enabled: bool) -> Self {
        self.debug_traces = enabled;
        self
    }

    /// Set the cancel grace period.
    #[must_use]
    pub const fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }
}

fn program_override(
    source: &dyn SettingsSource,
    var: &'static str,
) -> Result<Option<PathBuf>, SettingsError> {
    match source.get(var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(SettingsError::EmptyOverride { var }),
        Some(value) => Ok(Some(PathBuf::from(value.trim()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = BridgeSettings::from_source(&source(&[])).unwrap();
        assert_eq!(settings, BridgeSettings::with_defaults());
        assert!(!settings.debug_traces);
        assert_eq!(settings.cancel_grace, Duration::from_secs(5));
        assert_eq!(settings.version_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_debug_toggle_requires_exact_one() {
        let on = BridgeSettings::from_source(&source(&[(DEBUG_ENV, " 1 ")])).unwrap();
        assert!(on.debug_traces);

        for value in ["0", "true", "", "yes"] {
            let off = BridgeSettings::from_source(&source(&[(DEBUG_ENV, value)])).unwrap();
            assert!(!off.debug_traces, "{value:?} must not enable traces");
        }
    }

    #[test]
    fn test_program_overrides() {
        let settings = BridgeSettings::from_source(&source(&[
            (SPOTDL_ENV, "/opt/bin/spotdl"),
            (YTDLP_ENV, "/opt/bin/yt-dlp"),
        ]))
        .unwrap();
        assert_eq!(settings.spotdl_program, PathBuf::from("/opt/bin/spotdl"));
        assert_eq!(settings.ytdlp_program, PathBuf::from("/opt/bin/yt-dlp"));
        assert_eq!(settings.ffmpeg_program, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_empty_override_rejected() {
        let err = BridgeSettings::from_source(&source(&[(FFMPEG_ENV, "  ")])).unwrap_err();
        assert_eq!(err, SettingsError::EmptyOverride { var: FFMPEG_ENV });
    }
}
