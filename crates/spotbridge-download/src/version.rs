//! `--version` probing for external tools.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Errors that can occur while probing a tool's version.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("{program} is not installed or not in PATH")]
    NotFound { program: String },

    #[error("{program} --version timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("{program} --version exited with {status}")]
    Failed { program: String, status: String },

    #[error("{program} printed no version")]
    Empty { program: String },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Run `<program> --version` and return its trimmed stdout.
///
/// The child is killed if it has not finished within `limit`.
pub async fn probe_version(program: &Path, limit: Duration) -> Result<String, VersionError> {
    let name = program.display().to_string();

    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match timeout(limit, output).await {
        Err(_) => {
            return Err(VersionError::Timeout {
                program: name,
                secs: limit.as_secs(),
            });
        }
        Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
            return Err(VersionError::NotFound { program: name });
        }
        Ok(Err(source)) => {
            return Err(VersionError::Io {
                program: name,
                source,
            });
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return Err(VersionError::Failed {
            program: name,
            status: output.status.to_string(),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        return Err(VersionError::Empty { program: name });
    }
    Ok(version)
}

/// Prefix `version` with `tool` unless it already starts with it.
pub fn label_version(tool: &str, version: &str) -> String {
    if version
        .to_ascii_lowercase()
        .starts_with(&tool.to_ascii_lowercase())
    {
        version.to_string()
    } else {
        format!("{tool} {version}")
    }
}
