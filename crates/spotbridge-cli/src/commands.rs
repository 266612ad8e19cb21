//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use spotbridge_core::DEFAULT_QUALITY;

/// How downloads are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyKind {
    /// Run `spotdl download` and narrate its output
    #[default]
    Process,
    /// Resolve songs with `spotdl save`, download them one by one
    SpotdlLib,
    /// Search YouTube by title and download with `yt-dlp`
    Youtube,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a URL is a Spotify track, playlist or album link
    Validate {
        /// URL to check
        url: String,
    },

    /// Download a track, playlist or album
    Download(DownloadArgs),

    /// Show the version of the backing download tool
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Spotify URL
    pub url: String,

    /// Directory the audio files are written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Target bitrate in kbps
    #[arg(short, long, default_value = DEFAULT_QUALITY)]
    pub quality: String,

    /// Re-download files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Do not embed album artwork
    #[arg(long)]
    pub no_art: bool,

    /// Normalize loudness
    #[arg(long)]
    pub normalize: bool,
}
