//! Core domain types and ports for spotbridge.
//!
//! This crate holds everything both download strategies share: the
//! request and event types, URL validation, the typed download outcome,
//! the event sink port with its fallback emitter, and settings. It has no
//! knowledge of processes or of any particular download tool.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod download;
pub mod emitter;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_QUALITY, DownloadRequest, INVALID_URL_MESSAGE, UrlKind, ValidationResult,
    extract_spotify_id, validate_url,
};
pub use download::{COMPLETED_MESSAGE, DownloadError, DownloadOutcome, DownloadResult};
pub use emitter::{Delivery, ProgressEmitter};
pub use events::{
    CancelReport, DownloadStatus, Progress, ProgressEvent, Severity, VersionReport, VersionStatus,
};
pub use ports::{EventSink, NoopSink, SinkError, StdoutSink};
pub use settings::{BridgeSettings, SettingsError, SettingsSource};
