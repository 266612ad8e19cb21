//! Command-line host for spotbridge.
//!
//! Prints every event as one JSON line on stdout. Logs go to stderr.

#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary target
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, build_bridge};
pub use commands::{Commands, DownloadArgs, StrategyKind};
pub use error::CliError;
pub use parser::Cli;
