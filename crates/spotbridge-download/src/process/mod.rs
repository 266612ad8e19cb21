//! External-process strategy.
//!
//! Spawns `spotdl download` as a child process, merges its stdout and
//! stderr into one line stream, classifies each line and forwards the
//! resulting events. Cancellation terminates the child.
//!
//! - `command`: argument construction
//! - `classifier`: line → event mapping
//! - `shutdown`: SIGTERM → SIGKILL escalation

pub mod classifier;
pub mod command;
pub mod shutdown;

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use spotbridge_core::{
    BridgeSettings, DownloadError, DownloadRequest, DownloadResult, ProgressEmitter,
};

use crate::strategy::DownloadStrategy;
use crate::version::{VersionError, probe_version};

use classifier::{OutputClassifier, SpotdlClassifier};
use command::spotdl_download_args;
use shutdown::shutdown_child;

/// Program name used in messages.
const TOOL_NAME: &str = "spotdl";

/// Downloads by running the `spotdl` command-line tool.
pub struct ProcessDownloader {
    settings: BridgeSettings,
    classifier: Arc<dyn OutputClassifier>,
}

impl ProcessDownloader {
    /// Create a process strategy using the `spotdl` output classifier.
    pub fn new(settings: BridgeSettings) -> Self {
        Self {
            settings,
            classifier: Arc::new(SpotdlClassifier::new()),
        }
    }

    /// Replace the output classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn OutputClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    fn spawn(&self, request: &DownloadRequest) -> DownloadResult<Child> {
        let program = &self.settings.spotdl_program;
        let args = spotdl_download_args(request);
        debug!(program = %program.display(), ?args, "spawning spotdl");

        Command::new(program)
            .args(&args)
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(program, &e))
    }

    async fn terminate(&self, child: &mut Child) {
        match shutdown_child(child, self.settings.cancel_grace).await {
            Ok(status) => info!(%status, "spotdl stopped after cancellation"),
            Err(e) => warn!(error = %e, "failed to stop spotdl cleanly"),
        }
    }
}

#[async_trait]
impl DownloadStrategy for ProcessDownloader {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
        emitter: &ProgressEmitter,
    ) -> DownloadResult<()> {
        let mut child = self.spawn(request)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::failed("Missing stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::failed("Missing stderr"))?;

        let (tx, mut lines) = mpsc::unbounded_channel();
        let stdout_task = tokio::spawn(forward_lines(stdout, tx.clone()));
        let stderr_task = tokio::spawn(forward_lines(stderr, tx));

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    self.terminate(&mut child).await;
                    stdout_task.abort();
                    stderr_task.abort();
                    return Err(DownloadError::Cancelled);
                }

                line = lines.recv() => {
                    let Some(line) = line else { break; };
                    if let Some(event) = self.classifier.classify(&line) {
                        emitter.emit(&event);
                    }
                }
            }
        }

        let status = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                self.terminate(&mut child).await;
                return Err(DownloadError::Cancelled);
            }

            status = child.wait() => status?,
        };

        if status.success() {
            info!("spotdl finished");
            Ok(())
        } else {
            let code = status.code().unwrap_or(-1);
            warn!(code, "spotdl failed");
            Err(DownloadError::exit_status(TOOL_NAME, code))
        }
    }

    async fn version(&self) -> Result<String, VersionError> {
        probe_version(&self.settings.spotdl_program, self.settings.version_timeout).await
    }
}

/// Send each line of `reader` to `tx` until EOF or the receiver closes.
///
/// Invalid UTF-8 is replaced rather than ending the stream.
async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if tx.send(line.to_string()).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(error = %e, "output stream closed");
                break;
            }
        }
    }
}

fn spawn_error(program: &Path, err: &io::Error) -> DownloadError {
    if err.kind() == io::ErrorKind::NotFound {
        DownloadError::unavailable(format!(
            "{} is not available. Install spotdl or set SPOTBRIDGE_SPOTDL.",
            program.display()
        ))
    } else {
        DownloadError::from_io_error(err)
    }
}
