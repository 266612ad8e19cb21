//! Progress events streamed to the host while a download runs.
//!
//! # Wire Format
//!
//! ```json
//! {"status": "downloading", "progress": 42, "message": "Downloading: 42%", "detail": "...", "type": "info"}
//! ```
//!
//! Unknown progress is sent as `-1`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of a download as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    Downloading,
    Converting,
    Completed,
    Error,
    Cancelled,
}

impl DownloadStatus {
    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Downloading => "downloading",
            Self::Converting => "converting",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further events follow this one for the same download.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Cancelled)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to an event, serialized as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

/// Progress percentage, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Progress {
    Percent(u8),
    #[default]
    Unknown,
}

impl Progress {
    /// Progress of a finished download.
    pub const COMPLETE: Self = Self::Percent(100);

    /// Zero progress.
    pub const ZERO: Self = Self::Percent(0);

    /// Build a progress value, clamping to 0..=100.
    pub fn percent(value: impl Into<f64>) -> Self {
        let value: f64 = value.into();
        if value.is_nan() {
            return Self::Unknown;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clamped = value.clamp(0.0, 100.0) as u8;
        Self::Percent(clamped)
    }

    /// Percentage if known.
    pub const fn value(self) -> Option<u8> {
        match self {
            Self::Percent(p) => Some(p),
            Self::Unknown => None,
        }
    }
}

impl From<Progress> for i64 {
    fn from(progress: Progress) -> Self {
        match progress {
            Progress::Percent(p) => Self::from(p),
            Progress::Unknown => -1,
        }
    }
}

impl From<i64> for Progress {
    fn from(value: i64) -> Self {
        match u8::try_from(value) {
            Ok(p) if p <= 100 => Self::Percent(p),
            Ok(_) => Self::COMPLETE,
            Err(_) if value > 0 => Self::COMPLETE,
            Err(_) => Self::Unknown,
        }
    }
}

/// One status line delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub status: DownloadStatus,
    pub progress: Progress,
    pub message: String,
    /// Raw tool output the event was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "type")]
    pub severity: Severity,
}

impl ProgressEvent {
    /// Create an event without a detail line.
    pub fn new(
        status: DownloadStatus,
        progress: Progress,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            status,
            progress,
            message: message.into(),
            detail: None,
            severity,
        }
    }

    /// Informational `downloading` event at a given percentage.
    pub fn downloading(percent: u8, message: impl Into<String>) -> Self {
        Self::new(
            DownloadStatus::Downloading,
            Progress::percent(percent),
            message,
            Severity::Info,
        )
    }

    /// Informational `converting` event at a given percentage.
    pub fn converting(percent: u8, message: impl Into<String>) -> Self {
        Self::new(
            DownloadStatus::Converting,
            Progress::percent(percent),
            message,
            Severity::Info,
        )
    }

    /// Terminal success event.
    pub fn completed(message: impl Into<String>) -> Self {
        Self::new(
            DownloadStatus::Completed,
            Progress::COMPLETE,
            message,
            Severity::Success,
        )
    }

    /// Terminal error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DownloadStatus::Error, Progress::ZERO, message, Severity::Error)
    }

    /// Terminal cancellation event.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(
            DownloadStatus::Cancelled,
            Progress::ZERO,
            message,
            Severity::Warning,
        )
    }

    /// Attach the raw line this event was derived from.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_clamps() {
        assert_eq!(Progress::percent(42), Progress::Percent(42));
        assert_eq!(Progress::percent(250), Progress::COMPLETE);
        assert_eq!(Progress::percent(-3), Progress::ZERO);
        assert_eq!(Progress::percent(f64::NAN), Progress::Unknown);
        assert_eq!(Progress::percent(99.9), Progress::Percent(99));
    }

    #[test]
    fn test_unknown_progress_serializes_as_sentinel() {
        let event = ProgressEvent::new(
            DownloadStatus::Downloading,
            Progress::Unknown,
            "working",
            Severity::Info,
        );
        let json: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(json["progress"], -1);
        assert_eq!(json["status"], "downloading");
        assert_eq!(json["type"], "info");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_event_parses_back() {
        let json = r#"{"status":"completed","progress":100,"message":"done","type":"success"}"#;
        let event: ProgressEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ProgressEvent::completed("done"));

        let json = r#"{"status":"downloading","progress":-1,"message":"x","detail":"raw","type":"warning"}"#;
        let event: ProgressEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.progress, Progress::Unknown);
        assert_eq!(event.detail.as_deref(), Some("raw"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(DownloadStatus::Completed.is_terminal());
        assert!(DownloadStatus::Error.is_terminal());
        assert!(DownloadStatus::Cancelled.is_terminal());
        assert!(!DownloadStatus::Downloading.is_terminal());
        assert!(!DownloadStatus::Converting.is_terminal());
    }

    #[test]
    fn test_constructors_pick_severity() {
        assert_eq!(ProgressEvent::cancelled("x").severity, Severity::Warning);
        assert_eq!(ProgressEvent::error("x").severity, Severity::Error);
        assert_eq!(ProgressEvent::completed("x").progress, Progress::COMPLETE);
        assert_eq!(ProgressEvent::converting(95, "x").status, DownloadStatus::Converting);
    }
}
