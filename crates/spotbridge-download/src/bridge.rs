//! Host-facing facade.
//!
//! `SpotBridge` is the surface a host embeds: validate a URL, run a
//! download against a `DownloadSession`, cancel it from another thread and
//! ask for the backing tool's version. Every progress update goes through
//! the `ProgressEmitter`; the typed `DownloadOutcome` is also returned so
//! the host never has to parse event text.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use spotbridge_core::{
    BridgeSettings, CancelReport, DownloadError, DownloadOutcome, DownloadRequest,
    DownloadResult, EventSink, ProgressEmitter, ProgressEvent, ValidationResult, VersionReport,
};

use crate::library::{
    LibraryDownloader, LibraryError, SongLibrary, SpotdlLibrary, YoutubeSearchLibrary,
};
use crate::process::ProcessDownloader;
use crate::session::DownloadSession;
use crate::strategy::DownloadStrategy;

/// Message of the first event of every accepted download.
pub const STARTING_MESSAGE: &str = "Starting download...";

/// Entry point for hosts.
pub struct SpotBridge {
    strategy: Arc<dyn DownloadStrategy>,
    emitter: ProgressEmitter,
    settings: BridgeSettings,
}

impl SpotBridge {
    /// Bridge over any strategy.
    pub fn new(strategy: Arc<dyn DownloadStrategy>, settings: BridgeSettings) -> Self {
        Self {
            strategy,
            emitter: ProgressEmitter::new(),
            settings,
        }
    }

    /// Bridge running the `spotdl` command-line tool.
    pub fn process(settings: BridgeSettings) -> Self {
        let strategy = Arc::new(ProcessDownloader::new(settings.clone()));
        Self::new(strategy, settings)
    }

    /// Bridge driving `library` through the library checkpoints.
    pub fn library(library: Arc<dyn SongLibrary>, settings: BridgeSettings) -> Self {
        let strategy = Arc::new(LibraryDownloader::new(library, settings.clone()));
        Self::new(strategy, settings)
    }

    /// Library bridge backed by `spotdl save` / `spotdl download`.
    pub fn spotdl_library(settings: BridgeSettings) -> Self {
        let library = Arc::new(SpotdlLibrary::new(&settings));
        Self::library(library, settings)
    }

    /// Library bridge backed by oEmbed search and `yt-dlp`.
    pub fn youtube_library(settings: BridgeSettings) -> Result<Self, LibraryError> {
        let library = Arc::new(YoutubeSearchLibrary::new(&settings)?);
        Ok(Self::library(library, settings))
    }

    /// Replace the emitter, e.g. to inject a host bridge or console.
    #[must_use]
    pub fn with_emitter(mut self, emitter: ProgressEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub const fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub const fn emitter(&self) -> &ProgressEmitter {
        &self.emitter
    }

    /// Register the host event sink. `None` clears it.
    pub fn set_event_sink(&self, sink: Option<Arc<dyn EventSink>>) {
        self.emitter.set_sink(sink);
    }

    /// Classify `url` without touching the network.
    #[allow(clippy::unused_self)]
    pub fn validate_url(&self, url: &str) -> ValidationResult {
        spotbridge_core::validate_url(url)
    }

    /// Run one download to completion, failure or cancellation.
    ///
    /// The session is released before the terminal events go out, so a
    /// host reacting to them can start the next download immediately.
    pub async fn start_download(
        &self,
        session: &DownloadSession,
        request: &DownloadRequest,
    ) -> DownloadOutcome {
        let outcome = match session.begin() {
            Ok(active) => {
                info!(url = %request.url, strategy = self.strategy.name(), "download started");
                let result = self.run(request, active.token()).await;
                drop(active);
                DownloadOutcome::from(result)
            }
            Err(err) => {
                warn!(url = %request.url, "download rejected: session busy");
                DownloadOutcome::Failed(err)
            }
        };

        self.finish(&outcome);
        outcome
    }

    /// Blocking variant of `start_download` for hosts on plain threads.
    ///
    /// Drives the download on a private current-thread runtime. Must not
    /// be called from inside an async context.
    pub fn start_download_blocking(
        &self,
        session: &DownloadSession,
        request: &DownloadRequest,
    ) -> DownloadOutcome {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.start_download(session, request)),
            Err(e) => {
                let outcome = DownloadOutcome::Failed(DownloadError::from_io_error(&e));
                self.finish(&outcome);
                outcome
            }
        }
    }

    /// Ask the session's active download to stop.
    pub fn cancel_download(&self, session: &DownloadSession) -> CancelReport {
        if session.cancel() {
            info!("download cancellation requested");
            CancelReport::requested()
        } else {
            CancelReport::no_active_download()
        }
    }

    /// Version of the tool behind the current strategy.
    pub async fn get_version(&self) -> VersionReport {
        match self.strategy.version().await {
            Ok(version) => VersionReport::success(version),
            Err(e) => {
                warn!(error = %e, "version probe failed");
                VersionReport::failure(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        cancel: &tokio_util::sync::CancellationToken,
    ) -> DownloadResult<()> {
        if !spotbridge_core::validate_url(&request.url).valid {
            return Err(DownloadError::invalid_url(&request.url));
        }

        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;

        self.emitter
            .emit(&ProgressEvent::downloading(0, STARTING_MESSAGE));

        self.strategy.run(request, cancel, &self.emitter).await
    }

    fn finish(&self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Completed => info!("download completed"),
            DownloadOutcome::Cancelled => info!("download cancelled"),
            DownloadOutcome::Failed(err) => error!(error = %err, "download failed"),
        }
        for event in outcome.terminal_events(self.settings.debug_traces) {
            self.emitter.emit(&event);
        }
    }
}

impl fmt::Debug for SpotBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotBridge")
            .field("strategy", &self.strategy.name())
            .field("emitter", &self.emitter)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use spotbridge_core::{DownloadStatus, Progress, Severity, SinkError};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::version::VersionError;

    #[derive(Default)]
    struct CaptureSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl EventSink for CaptureSink {
        fn emit(&self, payload: &str) -> Result<(), SinkError> {
            let event = serde_json::from_str(payload)
                .map_err(|e| SinkError::Rejected(e.to_string()))?;
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    /// Strategy returning a fixed result.
    struct FixedStrategy(DownloadResult<()>);

    #[async_trait]
    impl DownloadStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn run(
            &self,
            _request: &DownloadRequest,
            _cancel: &CancellationToken,
            _emitter: &ProgressEmitter,
        ) -> DownloadResult<()> {
            self.0.clone()
        }

        async fn version(&self) -> Result<String, VersionError> {
            Err(VersionError::NotFound {
                program: "fixed".into(),
            })
        }
    }

    fn bridge(result: DownloadResult<()>, debug: bool) -> (SpotBridge, Arc<CaptureSink>) {
        let settings = BridgeSettings::with_defaults().with_debug_traces(debug);
        let bridge = SpotBridge::new(Arc::new(FixedStrategy(result)), settings);
        let sink = Arc::new(CaptureSink::default());
        bridge.set_event_sink(Some(sink.clone()));
        (bridge, sink)
    }

    fn request(dir: &tempfile::TempDir) -> DownloadRequest {
        DownloadRequest::new(
            "https://open.spotify.com/track/abc123",
            dir.path().join("out"),
        )
    }

    #[tokio::test]
    async fn test_completed_download() {
        let dir = tempfile::tempdir().unwrap();
        let (bridge, sink) = bridge(Ok(()), false);
        let session = DownloadSession::new();

        let outcome = bridge.start_download(&session, &request(&dir)).await;
        assert!(outcome.is_completed());
        assert!(!session.is_active());
        assert!(dir.path().join("out").is_dir());

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, STARTING_MESSAGE);
        assert_eq!(events[0].progress, Progress::ZERO);
        assert_eq!(events[1].status, DownloadStatus::Completed);
        assert_eq!(events[1].progress, Progress::COMPLETE);
        assert_eq!(events[1].severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_invalid_url_emits_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let (bridge, sink) = bridge(Ok(()), true);
        let session = DownloadSession::new();
        let request = DownloadRequest::new("https://example.com/track/abc", dir.path());

        let outcome = bridge.start_download(&session, &request).await;
        assert!(matches!(
            outcome.error(),
            Some(DownloadError::InvalidUrl { .. })
        ));

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Invalid Spotify URL");
        assert_eq!(events[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_busy_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (bridge, sink) = bridge(Ok(()), false);
        let session = DownloadSession::new();
        let _held = session.begin().unwrap();

        let outcome = bridge.start_download(&session, &request(&dir)).await;
        assert_eq!(outcome.error(), Some(&DownloadError::AlreadyActive));
        assert_eq!(sink.events.lock().unwrap().len(), 1);
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_failure_with_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let failure = DownloadError::Failed {
            message: "boom".into(),
            diagnostic: Some("boom\ncaused by: disk full".into()),
        };
        let (bridge, sink) = bridge(Err(failure), true);

        bridge
            .start_download(&DownloadSession::new(), &request(&dir))
            .await;

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].message, "Download failed: boom");
        assert!(events[2].message.contains("disk full"));
    }

    #[tokio::test]
    async fn test_cancelled_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let (bridge, sink) = bridge(Err(DownloadError::Cancelled), false);

        let outcome = bridge
            .start_download(&DownloadSession::new(), &request(&dir))
            .await;
        assert!(outcome.is_cancelled());

        let events = sink.events.lock().unwrap();
        let last = events.last().unwrap();
        assert_eq!(last.status, DownloadStatus::Cancelled);
        assert_eq!(last.message, "Download cancelled by user");
        assert_eq!(last.severity, Severity::Warning);
    }

    #[test]
    fn test_cancel_without_download() {
        let (bridge, _sink) = bridge(Ok(()), false);
        let report = bridge.cancel_download(&DownloadSession::new());
        assert_eq!(report, CancelReport::no_active_download());
    }

    #[test]
    fn test_blocking_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let (bridge, _sink) = bridge(Ok(()), false);
        let outcome = bridge.start_download_blocking(&DownloadSession::new(), &request(&dir));
        assert!(outcome.is_completed());
    }

    #[tokio::test]
    async fn test_version_failure_report() {
        let (bridge, _sink) = bridge(Ok(()), false);
        let report = bridge.get_version().await;
        assert!(report.to_json().contains("\"status\":\"error\""));
        assert!(report.to_json().contains("fixed is not installed"));
    }
}
