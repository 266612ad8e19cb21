//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::{Commands, StrategyKind};

/// Download Spotify tracks, playlists and albums as mp3 files.
#[derive(Parser, Debug)]
#[command(name = "spotbridge")]
#[command(about = "Download Spotify links through spotdl or yt-dlp")]
#[command(version)]
pub struct Cli {
    /// Download strategy
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value_t = StrategyKind::Process,
        env = "SPOTBRIDGE_STRATEGY"
    )]
    pub strategy: StrategyKind,

    /// Enable verbose/debug logging on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
