//! Download error types.
//!
//! These errors are serializable and do not hold external error types like
//! `std::io::Error`. For I/O errors, we capture the kind and message as
//! strings.

use std::error::Error as StdError;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for download operations.
///
/// Cancellation is its own variant. Callers never need to inspect message
/// text to tell a cancelled download from a failed one.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// The URL is not a Spotify track, playlist or album link.
    #[error("Invalid Spotify URL: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// The search returned no songs.
    #[error("No tracks found for URL")]
    NoResults,

    /// The session already has a download running.
    #[error("A download is already in progress")]
    AlreadyActive,

    /// I/O error during file or process operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "NotFound", "PermissionDenied").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The backing tool or library cannot be used.
    #[error("{message}")]
    Unavailable {
        /// What is missing.
        message: String,
    },

    /// The external tool exited unsuccessfully.
    #[error("{program} exited with code {code}")]
    ExitStatus {
        /// Program name.
        program: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
    },

    /// The library or tool reported a failure.
    #[error("{message}")]
    Failed {
        /// Message reported by the failing component.
        message: String,
        /// Full cause chain, shown only when diagnostics are enabled.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        diagnostic: Option<String>,
    },

    /// Download was cancelled by the user.
    #[error("Download cancelled by user")]
    Cancelled,
}

impl DownloadError {
    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create an I/O error from a `std::io::Error`.
    ///
    /// This captures the error kind name and message for serialization.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an exit status error.
    pub fn exit_status(program: impl Into<String>, code: i32) -> Self {
        Self::ExitStatus {
            program: program.into(),
            code,
        }
    }

    /// Create a failure with a plain message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            diagnostic: None,
        }
    }

    /// Create a failure from an error, recording its cause chain.
    pub fn from_source(err: &(dyn StdError + 'static)) -> Self {
        Self::Failed {
            message: err.to_string(),
            diagnostic: Some(cause_chain(err)),
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Diagnostic detail, falling back to the debug representation.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Failed {
                diagnostic: Some(diagnostic),
                ..
            } => diagnostic.clone(),
            other => format!("{other:?}"),
        }
    }

    /// Convert to the message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl { .. } => "Invalid Spotify URL".to_string(),
            Self::NoResults => "No tracks found for URL.".to_string(),
            Self::Io { message, .. } | Self::Failed { message, .. } => {
                format!("Download failed: {message}")
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

/// Render an error and all of its sources, one per line.
pub fn cause_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    let mut depth = 0;
    while let Some(cause) = source {
        let _ = write!(out, "\n  {depth}: {cause}");
        depth += 1;
        source = cause.source();
    }
    out
}

/// Convenience result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;
