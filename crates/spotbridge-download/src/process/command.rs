//! Argument construction for `spotdl download`.

use std::ffi::OsString;

use spotbridge_core::DownloadRequest;

/// Output container passed to `spotdl`.
pub const OUTPUT_FORMAT: &str = "mp3";

/// ffmpeg filter applied when normalization is requested.
pub const LOUDNORM_ARGS: &str = "-af loudnorm";

/// Build the `spotdl` arguments for `request`, program name excluded.
pub fn spotdl_download_args(request: &DownloadRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "download".into(),
        request.url.clone().into(),
        "--output".into(),
        request.output_dir.clone().into_os_string(),
        "--format".into(),
        OUTPUT_FORMAT.into(),
        "--bitrate".into(),
        format!("{}k", request.bitrate()).into(),
    ];

    if request.overwrite() {
        args.push("--overwrite".into());
        args.push("force".into());
    }
    if !request.embed_art {
        args.push("--skip-album-art".into());
    }
    if request.normalize {
        args.push("--ffmpeg-args".into());
        args.push(LOUDNORM_ARGS.into());
    }

    args
}
