//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Currency every entry is normalized into for reporting.
    #[serde(default = "default_base_currency")]
    pub base_currency: Currency,
    /// Exchange-rate pairs. One direction per pair is enough; inverses are
    /// derived when the rate table is built. Empty means use the builtin
    /// local-profile table.
    #[serde(default)]
    pub rates: Vec<RatePairConfig>,
}

/// A single configured exchange-rate pair.
#[derive(Debug, Clone, Deserialize)]
pub struct RatePairConfig {
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Positive exchange rate (1 `from` = `rate` `to`).
    pub rate: Decimal,
}

fn default_base_currency() -> Currency {
    Currency::Aed
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            rates: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Layers `config/default`, `config/{RUN_MODE}` and `FINLEDGER__`-prefixed
    /// environment variables, later sources overriding earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
