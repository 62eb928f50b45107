//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use simex_executor::ExecutorConfig;
use simex_wallet::WalletConfig;
use std::path::Path;

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Simulated fills against the virtual wallet.
    #[default]
    Paper,
    /// Real exchange order submission. Not implemented; rejected at
    /// application construction.
    Live,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Operating mode.
    #[serde(default)]
    pub mode: OperatingMode,
    /// Wallet ledger configuration.
    #[serde(default)]
    pub wallet: WalletConfig,
    /// Execution engine configuration.
    #[serde(default)]
    pub executor: ExecutorConfig,
}

impl AppConfig {
    /// Load configuration from the default locations.
    ///
    /// Resolution: `SIMEX_CONFIG` env var, then `config/default.toml`,
    /// then built-in defaults with a warning.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("SIMEX_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Check if in paper mode.
    pub fn is_paper_mode(&self) -> bool {
        self.mode == OperatingMode::Paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.is_paper_mode());
        assert_eq!(config.wallet.base_currency, "USD");
        assert_eq!(config.wallet.initial_capital, dec!(10000));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("mode"));
        assert!(toml_str.contains("base_currency"));
    }

    #[test]
    fn test_config_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.mode, config.mode);
        assert_eq!(parsed.wallet.initial_capital, config.wallet.initial_capital);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
            mode = "live"

            [executor]
            slippage_pct = "0.1"
            fee_pct = "0.25"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mode, OperatingMode::Live);
        assert_eq!(config.executor.slippage_pct, dec!(0.1));
        assert_eq!(config.executor.fee_pct, dec!(0.25));
        // Unspecified sections keep their defaults.
        assert_eq!(config.wallet.base_currency, "USD");
        assert_eq!(config.executor.min_trade_interval_ms, 60_000);
    }
}
