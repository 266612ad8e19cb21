//! Download request types.
//!
//! A request is built once by the host and never mutated while a download
//! is running. The strategies only ever read from it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Bitrate used when the host does not pick one.
pub const DEFAULT_QUALITY: &str = "320";

/// Request to download audio for a Spotify URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Spotify track, playlist or album URL.
    pub url: String,
    /// Directory the audio files are written to.
    pub output_dir: PathBuf,
    /// Target bitrate in kbps, without unit (e.g. "320").
    pub quality: String,
    /// Leave files that already exist untouched.
    pub skip_existing: bool,
    /// Embed album artwork into the output files.
    pub embed_art: bool,
    /// Run a loudness normalization filter during conversion.
    pub normalize: bool,
}

impl DownloadRequest {
    /// Create a request with default options.
    pub fn new(url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output_dir: output_dir.into(),
            quality: DEFAULT_QUALITY.to_string(),
            skip_existing: true,
            embed_art: true,
            normalize: false,
        }
    }

    /// Set the target bitrate.
    #[must_use]
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    /// Set whether existing files are skipped.
    #[must_use]
    pub const fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    /// Set whether artwork is embedded.
    #[must_use]
    pub const fn with_embed_art(mut self, embed_art: bool) -> Self {
        self.embed_art = embed_art;
        self
    }

    /// Set whether audio is loudness-normalized.
    #[must_use]
    pub const fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Whether existing files should be overwritten.
    pub const fn overwrite(&self) -> bool {
        !self.skip_existing
    }

    /// Quality with surrounding whitespace and any trailing `k` removed.
    pub fn bitrate(&self) -> &str {
        let trimmed = self.quality.trim();
        trimmed
            .strip_suffix(['k', 'K'])
            .unwrap_or(trimmed)
    }
}
