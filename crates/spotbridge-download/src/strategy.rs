//! The contract shared by both download strategies.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use spotbridge_core::{DownloadRequest, DownloadResult, ProgressEmitter};

use crate::version::VersionError;

/// A way of turning a validated request into files on disk.
///
/// Implementations emit intermediate progress through `emitter` and
/// return once the download has finished, failed or observed `cancel`.
/// Terminal events are emitted by the caller from the returned result.
#[async_trait]
pub trait DownloadStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the download. `request.output_dir` already exists.
    async fn run(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
        emitter: &ProgressEmitter,
    ) -> DownloadResult<()>;

    /// Version string of the backing tool.
    async fn version(&self) -> Result<String, VersionError>;
}
