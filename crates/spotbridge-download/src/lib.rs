//! Download strategies and the host facade for spotbridge.
//!
//! Two strategies implement [`DownloadStrategy`]:
//!
//! - [`LibraryDownloader`] drives a [`SongLibrary`] song by song through
//!   fixed progress checkpoints, observing cancellation between songs.
//! - [`ProcessDownloader`] runs the `spotdl` command-line tool, classifies
//!   its output line by line and terminates it on cancellation.
//!
//! Hosts talk to [`SpotBridge`] and own a [`DownloadSession`].

#![deny(unused_crate_dependencies)]

pub mod bridge;
pub mod library;
pub mod locate;
pub mod oembed;
pub mod process;
pub mod session;
pub mod strategy;
pub mod version;

pub use bridge::{STARTING_MESSAGE, SpotBridge};
pub use library::{
    LibraryDownloader, LibraryError, LibraryOptions, Song, SongLibrary, SpotdlLibrary,
    YoutubeSearchLibrary,
};
pub use oembed::{OembedClient, OembedError};
pub use process::ProcessDownloader;
pub use process::classifier::{OutputClassifier, SpotdlClassifier, parse_percent};
pub use session::{ActiveDownload, DownloadSession};
pub use strategy::DownloadStrategy;
pub use version::VersionError;
