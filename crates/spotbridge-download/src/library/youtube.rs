//! YouTube search library.
//!
//! Turns a Spotify URL into a YouTube search through the oEmbed title and
//! lets `yt-dlp` fetch and convert the first hit. Works without spotdl.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use spotbridge_core::{BridgeSettings, extract_spotify_id};

use super::tool::run_tool;
use super::{LibraryError, LibraryOptions, Song, SongLibrary};
use crate::oembed::OembedClient;
use crate::process::command::{LOUDNORM_ARGS, OUTPUT_FORMAT};
use crate::version::{label_version, probe_version};

/// yt-dlp search prefix returning only the best match.
pub const SEARCH_PREFIX: &str = "ytsearch1:";

const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Songs found by title on YouTube and downloaded with `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YoutubeSearchLibrary {
    oembed: OembedClient,
    ytdlp: PathBuf,
    version_timeout: Duration,
}

impl YoutubeSearchLibrary {
    pub fn new(settings: &BridgeSettings) -> Result<Self, LibraryError> {
        let oembed = OembedClient::new(settings.metadata_timeout)
            .map_err(|e| LibraryError::Metadata(e.to_string()))?;
        Ok(Self::with_oembed(oembed, settings))
    }

    /// Use a preconfigured oEmbed client.
    pub fn with_oembed(oembed: OembedClient, settings: &BridgeSettings) -> Self {
        Self {
            oembed,
            ytdlp: settings.ytdlp_program.clone(),
            version_timeout: settings.version_timeout,
        }
    }
}

/// Song searched for by `title`.
pub(crate) fn search_song(title: &str, song_id: Option<String>) -> Song {
    Song {
        name: title.to_string(),
        artists: Vec::new(),
        album_name: None,
        url: format!("{SEARCH_PREFIX}{title}"),
        song_id,
    }
}

/// Arguments for `yt-dlp`.
pub(crate) fn ytdlp_args(song: &Song, options: &LibraryOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-x".into(),
        "--audio-format".into(),
        OUTPUT_FORMAT.into(),
        "--audio-quality".into(),
        format!("{}K", options.bitrate).into(),
        "--no-playlist".into(),
        "--ffmpeg-location".into(),
        options.ffmpeg.clone().into_os_string(),
        "-o".into(),
        options.output.join(OUTPUT_TEMPLATE).into_os_string(),
    ];
    args.push(if options.overwrite {
        "--force-overwrites".into()
    } else {
        "--no-overwrites".into()
    });
    if options.embed_art {
        args.push("--embed-thumbnail".into());
    }
    if options.normalize {
        args.push("--postprocessor-args".into());
        args.push(format!("ffmpeg:{LOUDNORM_ARGS}").into());
    }
    args.push(song.url.clone().into());
    args
}

#[async_trait]
impl SongLibrary for YoutubeSearchLibrary {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn search(
        &self,
        queries: &[String],
        _options: &LibraryOptions,
    ) -> Result<Vec<Song>, LibraryError> {
        let mut songs = Vec::with_capacity(queries.len());
        for query in queries {
            let song_id = extract_spotify_id(query).map(|(_, id)| id);
            let title = self
                .oembed
                .fetch_title(query)
                .await
                .map_err(|e| LibraryError::Metadata(e.to_string()))?;
            match title {
                Some(title) => {
                    debug!(%title, "resolved search title");
                    songs.push(search_song(&title, song_id));
                }
                None => warn!(%query, "no title for URL"),
            }
        }
        Ok(songs)
    }

    async fn download(&self, song: &Song, options: &LibraryOptions) -> Result<(), LibraryError> {
        run_tool(&self.ytdlp, &ytdlp_args(song, options)).await?;
        Ok(())
    }

    async fn version(&self) -> Result<String, LibraryError> {
        let version = probe_version(&self.ytdlp, self.version_timeout).await?;
        Ok(label_version("yt-dlp", &version))
    }
}

#[cfg(test)]
mod tests {
    use spotbridge_core::DownloadRequest;

    use super::*;

    #[test]
    fn test_search_song() {
        let song = search_song("Song Title - Artist", Some("abc".into()));
        assert_eq!(song.url, "ytsearch1:Song Title - Artist");
        assert_eq!(song.display_title(), "Song Title - Artist - ");
        assert_eq!(song.song_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_ytdlp_args() {
        let request = DownloadRequest::new("u", "/music")
            .with_quality("256")
            .with_normalize(true);
        let mut options = LibraryOptions::from_request(&request, &BridgeSettings::with_defaults());
        options.ffmpeg = PathBuf::from("ffmpeg");
        let song = search_song("T", None);

        let args: Vec<String> = ytdlp_args(&song, &options)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args[0], "-x");
        assert!(args.windows(2).any(|w| w == ["--audio-format", "mp3"]));
        assert!(args.windows(2).any(|w| w == ["--audio-quality", "256K"]));
        assert!(args.windows(2).any(|w| w == ["-o", "/music/%(title)s.%(ext)s"]));
        assert!(
            args.windows(2)
                .any(|w| w == ["--postprocessor-args", "ffmpeg:-af loudnorm"])
        );
        assert!(args.contains(&"--no-overwrites".to_string()));
        assert!(args.contains(&"--embed-thumbnail".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("ytsearch1:T"));
    }
}
