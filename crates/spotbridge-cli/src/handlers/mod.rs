//! Command handlers.
//!
//! Each handler prints its JSON result on stdout and maps failures to a
//! `CliError` for the exit code.

pub mod download;
pub mod validate;
pub mod version;

pub use download::handle_download;
pub use validate::handle_validate;
pub use version::handle_version;
