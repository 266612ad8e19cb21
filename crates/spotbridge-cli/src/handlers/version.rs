//! `version` command.

use spotbridge_core::VersionStatus;
use spotbridge_download::SpotBridge;

use crate::error::CliError;

/// Print the backing tool's version report.
pub async fn handle_version(bridge: &SpotBridge) -> Result<(), CliError> {
    let report = bridge.get_version().await;
    println!("{}", report.to_json());
    match report.status {
        VersionStatus::Success => Ok(()),
        VersionStatus::Error => Err(CliError::Version(report.message.unwrap_or_default())),
    }
}
