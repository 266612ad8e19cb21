//! `download` command.
//!
//! Runs one download on a fresh session. The first Ctrl+C asks the
//! session to cancel; the download then winds down and reports its own
//! cancelled event.

use tokio::signal;
use tracing::warn;

use spotbridge_core::{DownloadOutcome, DownloadRequest};
use spotbridge_download::{DownloadSession, SpotBridge};

use crate::commands::DownloadArgs;
use crate::error::CliError;

impl DownloadArgs {
    /// Request described by these arguments.
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest::new(self.url.clone(), self.output.clone())
            .with_quality(self.quality.clone())
            .with_skip_existing(!self.overwrite)
            .with_embed_art(!self.no_art)
            .with_normalize(self.normalize)
    }
}

/// Download `args.url`, printing progress events as JSON lines.
pub async fn handle_download(bridge: &SpotBridge, args: &DownloadArgs) -> Result<(), CliError> {
    let session = DownloadSession::new();
    let request = args.to_request();

    let download = bridge.start_download(&session, &request);
    tokio::pin!(download);
    let mut ctrl_c = Box::pin(signal::ctrl_c());
    let mut interrupted = false;

    let outcome = loop {
        tokio::select! {
            outcome = &mut download => break outcome,

            result = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                if let Err(e) = result {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                    continue;
                }
                println!("{}", bridge.cancel_download(&session).to_json());
            }
        }
    };

    outcome_result(outcome)
}

fn outcome_result(outcome: DownloadOutcome) -> Result<(), CliError> {
    match outcome {
        DownloadOutcome::Completed => Ok(()),
        DownloadOutcome::Cancelled => Err(CliError::Cancelled),
        DownloadOutcome::Failed(err) => Err(CliError::Download(err)),
    }
}
