//! Composition root: settings from the environment, bridge per strategy.

use std::sync::Arc;

use spotbridge_core::{BridgeSettings, SettingsSource};
use spotbridge_download::{SpotBridge, SpotdlLibrary, YoutubeSearchLibrary};
use tracing::debug;

use crate::commands::StrategyKind;
use crate::error::CliError;

/// Everything needed to build a bridge.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub settings: BridgeSettings,
    pub strategy: StrategyKind,
}

impl CliConfig {
    /// Read settings from the process environment.
    pub fn from_env(strategy: StrategyKind) -> Result<Self, CliError> {
        Ok(Self {
            settings: BridgeSettings::from_env()?,
            strategy,
        })
    }

    /// Read settings from `source`.
    pub fn from_source(
        strategy: StrategyKind,
        source: &dyn SettingsSource,
    ) -> Result<Self, CliError> {
        Ok(Self {
            settings: BridgeSettings::from_source(source)?,
            strategy,
        })
    }
}

/// Build the bridge for `config.strategy`.
pub fn build_bridge(config: &CliConfig) -> Result<SpotBridge, CliError> {
    let settings = config.settings.clone();
    debug!(strategy = ?config.strategy, ?settings, "building bridge");

    let bridge = match config.strategy {
        StrategyKind::Process => SpotBridge::process(settings),
        StrategyKind::SpotdlLib => {
            SpotBridge::library(Arc::new(SpotdlLibrary::new(&settings)), settings)
        }
        StrategyKind::Youtube => {
            SpotBridge::library(Arc::new(YoutubeSearchLibrary::new(&settings)?), settings)
        }
    };
    Ok(bridge)
}
