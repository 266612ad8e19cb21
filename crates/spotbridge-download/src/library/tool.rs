//! Running helper tools to completion.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::LibraryError;

/// Lines of stderr kept in a failure message.
const ERROR_TAIL_LINES: usize = 3;

/// Run `program` with `args` and return its stdout.
///
/// A non-zero exit becomes `ToolFailed` carrying the last lines of stderr.
pub(crate) async fn run_tool(program: &Path, args: &[OsString]) -> Result<String, LibraryError> {
    let name = program.display().to_string();
    debug!(program = %name, ?args, "running tool");

    let output = Command::new(program)
        .args(args)
        .env("PYTHONUNBUFFERED", "1")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LibraryError::NotInstalled {
                    program: name.clone(),
                }
            } else {
                LibraryError::Spawn {
                    program: name.clone(),
                    source,
                }
            }
        })?;

    if !output.status.success() {
        return Err(LibraryError::ToolFailed {
            program: name,
            code: output.status.code().unwrap_or(-1),
            output: error_tail(&String::from_utf8_lossy(&output.stderr)),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn error_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join(" | ")
}
