//! Bot configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{constants, Party};

/// Which bot variant to run. Selection happens here, by configuration,
/// not by subtyping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BotKind {
    /// One-shot: create the initial market assets, then exit.
    MarketSetup,
    /// One-shot: propose trades from a file, then exit.
    TradeInjector,
    /// Long-running settlement reactor.
    Settlement,
}

/// Tuning for the settlement reactor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Minimum queued obligations per symbol before a matching pass
    /// considers that symbol.
    pub batch_size: usize,
    /// Period of the re-match trigger; `None` disables it, leaving
    /// matching driven purely by incoming events.
    pub poll_interval: Option<Duration>,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            batch_size: constants::DEFAULT_SETTLEMENT_BATCH_SIZE,
            poll_interval: Some(Duration::from_secs(constants::DEFAULT_POLL_INTERVAL_SECS)),
        }
    }
}

/// Configuration of one bot process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub application_id: String,
    pub party: Party,
    pub kind: BotKind,
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Asset CSV for the market setup bot.
    pub asset_file: Option<PathBuf>,
    /// Trade CSV for the trade injector bot.
    pub trade_file: Option<PathBuf>,
}

impl BotConfig {
    /// A settlement bot for the given party with default tuning.
    #[must_use]
    pub fn settlement(party: Party) -> Self {
        Self {
            application_id: constants::DEFAULT_APPLICATION_ID.to_string(),
            party,
            kind: BotKind::Settlement,
            settlement: SettlementConfig::default(),
            asset_file: None,
            trade_file: None,
        }
    }

    /// A market setup bot run by the issuer party.
    #[must_use]
    pub fn market_setup(party: Party, asset_file: PathBuf) -> Self {
        Self {
            kind: BotKind::MarketSetup,
            asset_file: Some(asset_file),
            ..Self::settlement(party)
        }
    }

    /// A trade injector for the given buyer party.
    #[must_use]
    pub fn trade_injector(party: Party, trade_file: PathBuf) -> Self {
        Self {
            kind: BotKind::TradeInjector,
            trade_file: Some(trade_file),
            ..Self::settlement(party)
        }
    }
}
