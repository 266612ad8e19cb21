//! Locating external programs.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Resolve `program` to an absolute path through `PATH`.
///
/// Paths with more than one component are returned as given. Bare names
/// that cannot be found are also returned unchanged so the eventual spawn
/// reports the missing program.
pub fn resolve_program(program: &Path) -> PathBuf {
    if program.components().count() > 1 {
        return program.to_path_buf();
    }
    match which::which(program) {
        Ok(path) => path,
        Err(e) => {
            debug!(program = %program.display(), error = %e, "program not on PATH");
            program.to_path_buf()
        }
    }
}
