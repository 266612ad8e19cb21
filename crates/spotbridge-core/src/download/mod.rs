//! Download error and outcome types.

mod errors;
mod outcome;

pub use errors::{DownloadError, DownloadResult, cause_chain};
pub use outcome::{COMPLETED_MESSAGE, DownloadOutcome};
