//! Canonical JSON payloads exchanged with the host.
//!
//! # Structure
//!
//! - `progress` - Streamed status lines for a running download
//! - `reports` - One-shot cancel and version results

mod progress;
mod reports;

pub use progress::{DownloadStatus, Progress, ProgressEvent, Severity};
pub use reports::{
    CANCEL_REQUESTED_MESSAGE, CancelReport, NO_ACTIVE_DOWNLOAD_MESSAGE, VersionReport,
    VersionStatus,
};
