//! `spotdl`-backed library.
//!
//! Search writes the resolved song list to a temporary save file with
//! `spotdl save` and reads it back. Each song is then fetched with its own
//! `spotdl download` call so cancellation can be observed between songs.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use spotbridge_core::BridgeSettings;

use super::tool::run_tool;
use super::{LibraryError, LibraryOptions, Song, SongLibrary};
use crate::process::command::{LOUDNORM_ARGS, OUTPUT_FORMAT};
use crate::version::{label_version, probe_version};

const SAVE_FILE_NAME: &str = "songs.spotdl";

/// Songs resolved and downloaded through the `spotdl` tool.
#[derive(Debug, Clone)]
pub struct SpotdlLibrary {
    spotdl: PathBuf,
    ytdlp: PathBuf,
    version_timeout: Duration,
}

impl SpotdlLibrary {
    pub fn new(settings: &BridgeSettings) -> Self {
        Self {
            spotdl: settings.spotdl_program.clone(),
            ytdlp: settings.ytdlp_program.clone(),
            version_timeout: settings.version_timeout,
        }
    }
}

/// Flags shared by `save` and `download`.
fn common_args(options: &LibraryOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--threads".into(),
        options.threads.to_string().into(),
        "--log-level".into(),
        options.log_level.into(),
        "--ffmpeg".into(),
        options.ffmpeg.clone().into_os_string(),
    ];
    if options.use_ytm_data {
        args.push("--ytm-data".into());
    }
    args
}

/// Arguments for `spotdl save`.
pub(crate) fn save_args(
    queries: &[String],
    save_file: PathBuf,
    options: &LibraryOptions,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["save".into()];
    args.extend(queries.iter().map(OsString::from));
    args.push("--save-file".into());
    args.push(save_file.into_os_string());
    args.extend(common_args(options));
    args
}

/// Arguments for downloading one song.
pub(crate) fn download_args(song: &Song, options: &LibraryOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "download".into(),
        song.url.clone().into(),
        "--output".into(),
        options.output.clone().into_os_string(),
        "--format".into(),
        OUTPUT_FORMAT.into(),
        "--bitrate".into(),
        format!("{}k", options.bitrate).into(),
        "--overwrite".into(),
        if options.overwrite { "force" } else { "skip" }.into(),
    ];
    args.extend(common_args(options));
    if options.print_errors {
        args.push("--print-errors".into());
    }
    if !options.embed_art {
        args.push("--skip-album-art".into());
    }
    if options.normalize {
        args.push("--ffmpeg-args".into());
        args.push(LOUDNORM_ARGS.into());
    }
    args
}

#[async_trait]
impl SongLibrary for SpotdlLibrary {
    fn name(&self) -> &'static str {
        "spotdl"
    }

    async fn search(
        &self,
        queries: &[String],
        options: &LibraryOptions,
    ) -> Result<Vec<Song>, LibraryError> {
        let dir = tempfile::tempdir().map_err(LibraryError::SongList)?;
        let save_file = options
            .save_file
            .clone()
            .unwrap_or_else(|| dir.path().join(SAVE_FILE_NAME));

        run_tool(&self.spotdl, &save_args(queries, save_file.clone(), options)).await?;

        let contents = tokio::fs::read_to_string(&save_file)
            .await
            .map_err(LibraryError::SongList)?;
        let songs: Vec<Song> = serde_json::from_str(&contents)?;
        debug!(count = songs.len(), "spotdl search finished");
        Ok(songs)
    }

    async fn download(&self, song: &Song, options: &LibraryOptions) -> Result<(), LibraryError> {
        run_tool(&self.spotdl, &download_args(song, options)).await?;
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

    fn render(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn options(request: &DownloadRequest) -> LibraryOptions {
        let settings = BridgeSettings::with_defaults();
        let mut options = LibraryOptions::from_request(request, &settings);
        options.ffmpeg = PathBuf::from("ffmpeg");
        options
    }

    #[test]
    fn test_save_args() {
        let request = DownloadRequest::new("https://open.spotify.com/playlist/p1", "/music");
        let args = render(&save_args(
            &[request.url.clone()],
            PathBuf::from("/tmp/x.spotdl"),
            &options(&request),
        ));
        assert_eq!(
            &args[..4],
            [
                "save",
                "https://open.spotify.com/playlist/p1",
                "--save-file",
                "/tmp/x.spotdl"
            ]
        );
        assert!(args.windows(2).any(|w| w == ["--threads", "1"]));
        assert!(args.contains(&"--ytm-data".to_string()));
    }

    #[test]
    fn test_download_args_follow_options() {
        let request = DownloadRequest::new("u", "/music")
            .with_quality("192")
            .with_embed_art(false);
        let song = Song::new("Song", "https://open.spotify.com/track/t1");
        let args = render(&download_args(&song, &options(&request)));

        assert_eq!(args[1], "https://open.spotify.com/track/t1");
        assert!(args.windows(2).any(|w| w == ["--bitrate", "192k"]));
        assert!(args.windows(2).any(|w| w == ["--overwrite", "skip"]));
        assert!(args.windows(2).any(|w| w == ["--ffmpeg", "ffmpeg"]));
        assert!(args.contains(&"--skip-album-art".to_string()));
        assert!(args.contains(&"--print-errors".to_string()));
        assert!(!args.contains(&"--ffmpeg-args".to_string()));
    }
}
