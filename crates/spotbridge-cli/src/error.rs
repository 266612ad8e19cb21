//! CLI-specific error types and exit codes.

use thiserror::Error;

use spotbridge_core::{DownloadError, SettingsError};
use spotbridge_download::LibraryError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    /// The selected library could not be set up.
    #[error("Setup error: {0}")]
    Setup(#[from] LibraryError),

    /// The URL is not a supported Spotify link.
    #[error("Invalid Spotify URL: {0}")]
    InvalidUrl(String),

    /// The download ended with an error.
    #[error("{0}")]
    Download(DownloadError),

    /// The download was cancelled.
    #[error("Download cancelled")]
    Cancelled,

    /// The version could not be determined.
    #[error("Version unavailable: {0}")]
    Version(String),
}

impl CliError {
    /// Map error to a process exit code.
    ///
    /// - 1: general failure
    /// - 2: invalid input
    /// - 78: configuration (`EX_CONFIG`)
    /// - 130: interrupted
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Setup(_) => 78,
            Self::InvalidUrl(_) => 2,
            Self::Download(_) | Self::Version(_) => 1,
            Self::Cancelled => 130,
        }
    }
}
