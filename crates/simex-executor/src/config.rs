//! Execution engine configuration.

use crate::error::{ExecutorError, ExecutorResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Paper-execution parameters.
///
/// All of these are engine construction-time constants, never per-call
/// inputs. Negative percentages and an inverted latency range are rejected
/// at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Flat slippage applied when no order book is available (percent).
    #[serde(default)]
    pub slippage_pct: Decimal,
    /// Taker fee (percent). Inflates buy costs, deflates sell proceeds.
    #[serde(default)]
    pub fee_pct: Decimal,
    /// Minimum interval between settlements (ms). Process-wide per engine
    /// instance, not per symbol.
    #[serde(default = "default_min_trade_interval_ms")]
    pub min_trade_interval_ms: u64,
    /// Lower bound of the simulated network round-trip (ms).
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,
    /// Upper bound of the simulated network round-trip (ms).
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,
}

fn default_min_trade_interval_ms() -> u64 {
    60_000
}

fn default_latency_min_ms() -> u64 {
    50
}

fn default_latency_max_ms() -> u64 {
    200
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            slippage_pct: Decimal::ZERO,
            fee_pct: Decimal::ZERO,
            min_trade_interval_ms: default_min_trade_interval_ms(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
        }
    }
}

impl ExecutorConfig {
    /// Validate construction-time invariants.
    pub fn validate(&self) -> ExecutorResult<()> {
        if self.slippage_pct.is_sign_negative() {
            return Err(ExecutorError::InvalidConfig(format!(
                "slippage_pct must be non-negative, got {}",
                self.slippage_pct
            )));
        }
        if self.fee_pct.is_sign_negative() {
            return Err(ExecutorError::InvalidConfig(format!(
                "fee_pct must be non-negative, got {}",
                self.fee_pct
            )));
        }
        if self.latency_min_ms > self.latency_max_ms {
            return Err(ExecutorError::InvalidConfig(format!(
                "latency range inverted: {} > {}",
                self.latency_min_ms, self.latency_max_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExecutorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.latency_min_ms, 50);
        assert_eq!(config.latency_max_ms, 200);
    }

    #[test]
    fn test_negative_slippage_rejected() {
        let config = ExecutorConfig {
            slippage_pct: dec!(-0.1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExecutorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let config = ExecutorConfig {
            fee_pct: dec!(-1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_latency_range_rejected() {
        let config = ExecutorConfig {
            latency_min_ms: 300,
            latency_max_ms: 200,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_defaults() {
        let config: ExecutorConfig = toml::from_str("slippage_pct = \"0.05\"").unwrap();
        assert_eq!(config.slippage_pct, dec!(0.05));
        assert_eq!(config.min_trade_interval_ms, 60_000);
    }
}
