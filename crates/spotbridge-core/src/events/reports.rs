//! One-shot results returned by cancel and version calls.

use serde::{Deserialize, Serialize};

use super::progress::{DownloadStatus, Progress, ProgressEvent, Severity};

/// Message returned when a cancellation was delivered to a running download.
pub const CANCEL_REQUESTED_MESSAGE: &str = "Download cancellation requested";

/// Message returned when there was nothing to cancel.
pub const NO_ACTIVE_DOWNLOAD_MESSAGE: &str = "No active download";

/// Result of a cancel request.
///
/// Same shape as a progress event without the detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReport {
    pub status: DownloadStatus,
    pub progress: Progress,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

impl CancelReport {
    /// Cancellation was signalled to the active download.
    pub fn requested() -> Self {
        Self {
            status: DownloadStatus::Cancelled,
            progress: Progress::ZERO,
            message: CANCEL_REQUESTED_MESSAGE.to_string(),
            severity: Severity::Warning,
        }
    }

    /// No download was running.
    pub fn no_active_download() -> Self {
        Self {
            status: DownloadStatus::Error,
            progress: Progress::ZERO,
            message: NO_ACTIVE_DOWNLOAD_MESSAGE.to_string(),
            severity: Severity::Error,
        }
    }

    /// Whether a running download was signalled.
    pub fn was_delivered(&self) -> bool {
        self.status == DownloadStatus::Cancelled
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<CancelReport> for ProgressEvent {
    fn from(report: CancelReport) -> Self {
        Self::new(report.status, report.progress, report.message, report.severity)
    }
}

/// Status of a version query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Success,
    Error,
}

/// Result of a version query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReport {
    pub status: VersionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub severity: Severity,
}

impl VersionReport {
    /// A version string was obtained.
    pub fn success(version: impl Into<String>) -> Self {
        Self {
            status: VersionStatus::Success,
            version: Some(version.into()),
            message: None,
            severity: Severity::Info,
        }
    }

    /// The version could not be determined.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: VersionStatus::Error,
            version: None,
            message: Some(message.into()),
            severity: Severity::Error,
        }
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
