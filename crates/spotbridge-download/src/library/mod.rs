//! In-process library strategy.
//!
//! A `SongLibrary` resolves a URL to a list of songs and downloads them
//! one at a time. `LibraryDownloader` drives it through fixed progress
//! checkpoints and checks for cancellation between songs.
//!
//! Two libraries ship with the crate:
//! - `SpotdlLibrary`: `spotdl save` for search, `spotdl download` per song
//! - `YoutubeSearchLibrary`: oEmbed title → `ytsearch1:` → `yt-dlp`

mod spotdl;
mod tool;
mod youtube;

pub use spotdl::SpotdlLibrary;
pub use youtube::YoutubeSearchLibrary;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use spotbridge_core::{
    BridgeSettings, DownloadError, DownloadRequest, DownloadResult, ProgressEmitter,
    ProgressEvent,
};

use crate::locate::resolve_program;
use crate::strategy::DownloadStrategy;
use crate::version::VersionError;

// ============================================================================
// Checkpoints
// ============================================================================

/// Progress after the library has been set up.
pub const PREPARING_PROGRESS: u8 = 3;
/// Progress while the search runs.
pub const FETCHING_PROGRESS: u8 = 10;
/// Progress once the song list is known.
pub const FOUND_PROGRESS: u8 = 20;
/// Progress reported for every song.
pub const SONG_PROGRESS: u8 = 25;
/// Progress after the last song.
pub const FINALIZING_PROGRESS: u8 = 95;

const UNKNOWN_TRACK: &str = "Unknown Track";

// ============================================================================
// Types
// ============================================================================

/// One song as returned by a library search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default = "unknown_track")]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    /// Address the library downloads from.
    pub url: String,
    #[serde(default)]
    pub song_id: Option<String>,
}

fn unknown_track() -> String {
    UNKNOWN_TRACK.to_string()
}

impl Song {
    /// Create a song with just a name and download address.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artists: Vec::new(),
            album_name: None,
            url: url.into(),
            song_id: None,
        }
    }

    /// Add an artist.
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artists.push(artist.into());
        self
    }

    /// `title - artist, artist` as shown in progress messages.
    pub fn display_title(&self) -> String {
        let name = if self.name.trim().is_empty() {
            UNKNOWN_TRACK
        } else {
            self.name.as_str()
        };
        format!("{name} - {}", self.artists.join(", "))
    }
}

/// Options handed to a library, derived from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    pub output: PathBuf,
    /// Bitrate in kbps without a unit.
    pub bitrate: String,
    pub overwrite: bool,
    pub save_file: Option<PathBuf>,
    pub threads: u8,
    /// Use YouTube Music metadata to pick better matches.
    pub use_ytm_data: bool,
    pub print_errors: bool,
    pub ffmpeg: PathBuf,
    pub log_level: &'static str,
    pub embed_art: bool,
    pub normalize: bool,
}

impl LibraryOptions {
    /// Build options for `request`.
    pub fn from_request(request: &DownloadRequest, settings: &BridgeSettings) -> Self {
        Self {
            output: request.output_dir.clone(),
            bitrate: request.bitrate().to_string(),
            overwrite: request.overwrite(),
            save_file: None,
            threads: 1,
            use_ytm_data: true,
            print_errors: true,
            ffmpeg: resolve_program(&settings.ffmpeg_program),
            log_level: "INFO",
            embed_art: request.embed_art,
            normalize: request.normalize,
        }
    }
}

/// Errors raised by a song library.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{program} is not available. Check your installation.")]
    NotInstalled { program: String },

    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}: {output}")]
    ToolFailed {
        program: String,
        code: i32,
        output: String,
    },

    #[error("failed to read song list")]
    SongList(#[source] std::io::Error),

    #[error("malformed song list")]
    Parse(#[from] serde_json::Error),

    #[error("metadata lookup failed: {0}")]
    Metadata(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

impl From<LibraryError> for DownloadError {
    fn from(err: LibraryError) -> Self {
        match &err {
            LibraryError::NotInstalled { .. } => Self::unavailable(err.to_string()),
            _ => Self::from_source(&err),
        }
    }
}

/// A source of songs that can be searched and downloaded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SongLibrary: Send + Sync {
    /// Name shown in the "Preparing" message.
    fn name(&self) -> &'static str;

    /// Resolve `queries` to songs, in download order.
    async fn search(
        &self,
        queries: &[String],
        options: &LibraryOptions,
    ) -> Result<Vec<Song>, LibraryError>;

    /// Download one song into `options.output`.
    async fn download(&self, song: &Song, options: &LibraryOptions) -> Result<(), LibraryError>;

    /// Version of the tool doing the actual downloading.
    async fn version(&self) -> Result<String, LibraryError>;
}

// ============================================================================
// Strategy
// ============================================================================

/// Download strategy backed by a `SongLibrary`.
pub struct LibraryDownloader {
    library: Arc<dyn SongLibrary>,
    settings: BridgeSettings,
}

impl LibraryDownloader {
    pub fn new(library: Arc<dyn SongLibrary>, settings: BridgeSettings) -> Self {
        Self { library, settings }
    }
}

#[async_trait]
impl DownloadStrategy for LibraryDownloader {
    fn name(&self) -> &'static str {
        "library"
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
        emitter: &ProgressEmitter,
    ) -> DownloadResult<()> {
        let library = self.library.name();
        emitter.emit(&ProgressEvent::downloading(
            PREPARING_PROGRESS,
            format!("Preparing {library}..."),
        ));
        let options = LibraryOptions::from_request(request, &self.settings);
        debug!(?options, "library options");

        emitter.emit(&ProgressEvent::downloading(
            FETCHING_PROGRESS,
            "Fetching metadata...",
        ));
        let songs = self
            .library
            .search(std::slice::from_ref(&request.url), &options)
            .await?;
        if songs.is_empty() {
            return Err(DownloadError::NoResults);
        }

        let total = songs.len();
        emitter.emit(&ProgressEvent::downloading(
            FOUND_PROGRESS,
            format!("Found {total} track(s)."),
        ));

        for (index, song) in songs.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(done = index, total, "library download cancelled");
                return Err(DownloadError::Cancelled);
            }
            emitter.emit(&ProgressEvent::downloading(
                SONG_PROGRESS,
                format!("Downloading {}/{total}: {}", index + 1, song.display_title()),
            ));
            self.library.download(song, &options).await?;
        }

        emitter.emit(&ProgressEvent::converting(
            FINALIZING_PROGRESS,
            "Finalizing files...",
        ));

        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }
        info!(total, "library download finished");
        Ok(())
    }

    async fn version(&self) -> Result<String, VersionError> {
        self.library.version().await.map_err(|e| match e {
            LibraryError::Version(inner) => inner,
            other => VersionError::Io {
                program: self.library.name().to_string(),
                source: std::io::Error::other(other.to_string()),
            },
        })
    }
}
