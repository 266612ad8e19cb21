//! Typed result of a download call.

use crate::events::ProgressEvent;

use super::errors::{DownloadError, DownloadResult};

/// Message of the terminal success event.
pub const COMPLETED_MESSAGE: &str = "Download completed successfully!";

/// How a download call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Every song was fetched.
    Completed,
    /// The session was cancelled before the download finished.
    Cancelled,
    /// The download stopped on an error.
    Failed(DownloadError),
}

impl DownloadOutcome {
    /// Whether the download finished successfully.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the download was cancelled.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Error, if the download failed.
    pub const fn error(&self) -> Option<&DownloadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Events closing the stream for this outcome.
    ///
    /// Runtime failures produce a second event with the cause chain when
    /// `include_diagnostic` is set.
    pub fn terminal_events(&self, include_diagnostic: bool) -> Vec<ProgressEvent> {
        match self {
            Self::Completed => vec![ProgressEvent::completed(COMPLETED_MESSAGE)],
            Self::Cancelled => vec![ProgressEvent::cancelled(
                DownloadError::Cancelled.user_message(),
            )],
            Self::Failed(err) => {
                let mut events = vec![ProgressEvent::error(err.user_message())];
                if include_diagnostic
                    && matches!(err, DownloadError::Failed { .. } | DownloadError::Io { .. })
                {
                    events.push(ProgressEvent::error(err.diagnostic()));
                }
                events
            }
        }
    }
}

impl From<DownloadResult<()>> for DownloadOutcome {
    fn from(result: DownloadResult<()>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(DownloadError::Cancelled) => Self::Cancelled,
            Err(err) => Self::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DownloadStatus, Progress, Severity};

    #[test]
    fn test_from_result() {
        assert_eq!(DownloadOutcome::from(Ok(())), DownloadOutcome::Completed);
        assert_eq!(
            DownloadOutcome::from(Err(DownloadError::Cancelled)),
            DownloadOutcome::Cancelled
        );
        assert!(
            DownloadOutcome::from(Err(DownloadError::failed("cancelled upstream")))
                .error()
                .is_some()
        );
    }

    #[test]
    fn test_terminal_events() {
        let events = DownloadOutcome::Completed.terminal_events(true);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, DownloadStatus::Completed);
        assert_eq!(events[0].progress, Progress::COMPLETE);
        assert_eq!(events[0].severity, Severity::Success);

        let events = DownloadOutcome::Cancelled.terminal_events(false);
        assert_eq!(events[0].status, DownloadStatus::Cancelled);
        assert_eq!(events[0].severity, Severity::Warning);
        assert_eq!(events[0].message, "Download cancelled by user");
    }

    #[test]
    fn test_diagnostic_is_opt_in() {
        let outcome = DownloadOutcome::Failed(DownloadError::failed("boom"));
        assert_eq!(outcome.terminal_events(false).len(), 1);

        let events = outcome.terminal_events(true);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "Download failed: boom");
        assert!(events[1].message.contains("boom"));

        // Input and lookup errors never carry a trace.
        let outcome = DownloadOutcome::Failed(DownloadError::NoResults);
        assert_eq!(outcome.terminal_events(true).len(), 1);
    }
}
