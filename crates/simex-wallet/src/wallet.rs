//! JSON-backed balance ledger.
//!
//! The ledger is loaded wholesale at startup and rewritten wholesale after
//! every mutation (write-through, no batching). In-memory state is
//! authoritative: a failed write is logged and the mutation stands, so
//! memory and disk can diverge until the next successful write. Only the
//! next load observes stale disk state.

use crate::error::{WalletError, WalletResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Wallet construction parameters.
///
/// The seeding fields (`initial_capital`, `initial_holdings`) only apply on
/// first run, when no persisted state exists. Re-running the program loads
/// the persisted ledger verbatim and ignores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path of the persisted ledger.
    #[serde(default = "default_wallet_file")]
    pub file: PathBuf,
    /// Asset the starting capital is denominated in.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Starting capital, first run only.
    #[serde(default = "default_initial_capital")]
    pub initial_capital: Decimal,
    /// Starting non-base holdings, first run only.
    #[serde(default)]
    pub initial_holdings: HashMap<String, Decimal>,
}

fn default_wallet_file() -> PathBuf {
    PathBuf::from("paper_wallet.json")
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_initial_capital() -> Decimal {
    Decimal::from(10_000)
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            file: default_wallet_file(),
            base_currency: default_base_currency(),
            initial_capital: default_initial_capital(),
            initial_holdings: HashMap::new(),
        }
    }
}

/// Per-asset balance ledger with write-through JSON persistence.
///
/// Invariant: no balance is ever negative; an asset absent from the map is
/// zero. The ledger exposes check-then-act primitives without internal
/// locking — callers sharing a wallet across engines must serialize whole
/// settlement sequences around it.
#[derive(Debug)]
pub struct PaperWallet {
    path: PathBuf,
    base_currency: String,
    balances: HashMap<String, Decimal>,
}

impl PaperWallet {
    /// Load the ledger from disk, or seed it on first run.
    ///
    /// An unreadable or corrupt file is logged and falls back to seeding;
    /// a missing file seeds and persists immediately.
    pub fn load(config: &WalletConfig) -> Self {
        let mut wallet = Self {
            path: config.file.clone(),
            base_currency: config.base_currency.clone(),
            balances: HashMap::new(),
        };

        if config.file.exists() {
            match Self::read_balances(&config.file) {
                Ok(balances) => {
                    wallet.balances = balances;
                    info!(path = %wallet.path.display(), "Loaded paper wallet");
                }
                Err(e) => {
                    error!(path = %wallet.path.display(), %e, "Failed to load paper wallet, reseeding");
                    wallet.seed(config);
                }
            }
        } else {
            wallet.seed(config);
        }

        wallet
    }

    fn read_balances(path: &Path) -> WalletResult<HashMap<String, Decimal>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn seed(&mut self, config: &WalletConfig) {
        self.balances.clear();
        self.balances
            .insert(config.base_currency.clone(), config.initial_capital);
        for (asset, amount) in &config.initial_holdings {
            self.balances.insert(asset.clone(), *amount);
        }
        self.persist();
        info!(
            capital = %config.initial_capital,
            currency = %config.base_currency,
            holdings = config.initial_holdings.len(),
            "Initialized new paper wallet"
        );
    }

    /// Write the ledger to disk.
    ///
    /// A failure is logged and swallowed; the in-memory mutation stands and
    /// only the next load is affected.
    fn persist(&self) {
        let result: WalletResult<()> = (|| {
            let json = serde_json::to_string_pretty(&self.balances)?;
            std::fs::write(&self.path, json)?;
            Ok(())
        })();

        if let Err(e) = result {
            warn!(path = %self.path.display(), %e, "Failed to persist paper wallet");
        }
    }

    /// Asset the ledger's capital is denominated in.
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Balance of an asset; zero if never seen. Never fails.
    pub fn balance_of(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Add funds to an asset and persist.
    pub fn deposit(&mut self, asset: &str, amount: Decimal) -> WalletResult<()> {
        if amount.is_sign_negative() {
            return Err(WalletError::InvalidAmount(amount));
        }

        let balance = self.balances.entry(asset.to_string()).or_default();
        *balance += amount;
        let new_balance = *balance;
        self.persist();
        info!(%asset, %amount, %new_balance, "Deposit");
        Ok(())
    }

    /// Subtract funds from an asset if the balance covers it.
    ///
    /// Returns `Ok(false)` without mutating when the balance is short.
    pub fn withdraw(&mut self, asset: &str, amount: Decimal) -> WalletResult<bool> {
        if amount.is_sign_negative() {
            return Err(WalletError::InvalidAmount(amount));
        }

        let current = self.balance_of(asset);
        if current < amount {
            warn!(%asset, %amount, available = %current, "Insufficient funds to withdraw");
            return Ok(false);
        }

        let new_balance = current - amount;
        self.balances.insert(asset.to_string(), new_balance);
        self.persist();
        info!(%asset, %amount, %new_balance, "Withdrawal");
        Ok(true)
    }

    /// Snapshot copy of every balance, safe to inspect.
    pub fn all_balances(&self) -> HashMap<String, Decimal> {
        self.balances.clone()
    }

    /// Total ledger value in the base currency at the given prices.
    ///
    /// Assets without a quoted price are skipped with a warning; the base
    /// currency itself counts at face value. Feeds the portfolio-snapshot
    /// audit sink.
    pub fn total_value(&self, prices: &HashMap<String, Decimal>) -> Decimal {
        let mut total = Decimal::ZERO;
        for (asset, balance) in &self.balances {
            if asset == &self.base_currency {
                total += balance;
            } else if let Some(price) = prices.get(asset) {
                total += balance * price;
            } else {
                warn!(%asset, "No price for asset, excluded from valuation");
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> WalletConfig {
        WalletConfig {
            file: dir.path().join("wallet.json"),
            base_currency: "USD".to_string(),
            initial_capital: dec!(10000),
            initial_holdings: HashMap::new(),
        }
    }

    #[test]
    fn test_first_run_seeds_capital() {
        let dir = TempDir::new().unwrap();
        let wallet = PaperWallet::load(&test_config(&dir));

        assert_eq!(wallet.balance_of("USD"), dec!(10000));
        assert_eq!(wallet.balance_of("BTC"), dec!(0));
        assert!(test_config(&dir).file.exists());
    }

    #[test]
    fn test_seeds_initial_holdings() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.initial_holdings.insert("BTC".to_string(), dec!(0.5));

        let wallet = PaperWallet::load(&config);
        assert_eq!(wallet.balance_of("BTC"), dec!(0.5));
    }

    #[test]
    fn test_reload_ignores_initial_capital() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let mut wallet = PaperWallet::load(&config);
        wallet.withdraw("USD", dec!(4000)).unwrap();

        // Re-running with a different configured capital must not reset.
        let mut reseeded = config.clone();
        reseeded.initial_capital = dec!(99999);
        let reloaded = PaperWallet::load(&reseeded);
        assert_eq!(reloaded.balance_of("USD"), dec!(6000));
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let dir = TempDir::new().unwrap();
        let mut wallet = PaperWallet::load(&test_config(&dir));

        wallet.deposit("BTC", dec!(1.25)).unwrap();
        assert_eq!(wallet.balance_of("BTC"), dec!(1.25));

        assert!(wallet.withdraw("BTC", dec!(0.25)).unwrap());
        assert_eq!(wallet.balance_of("BTC"), dec!(1.00));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let dir = TempDir::new().unwrap();
        let mut wallet = PaperWallet::load(&test_config(&dir));

        assert!(matches!(
            wallet.deposit("USD", dec!(-1)),
            Err(WalletError::InvalidAmount(_))
        ));
        assert!(matches!(
            wallet.withdraw("USD", dec!(-1)),
            Err(WalletError::InvalidAmount(_))
        ));
        assert_eq!(wallet.balance_of("USD"), dec!(10000));
    }

    #[test]
    fn test_overdraw_leaves_balance_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut wallet = PaperWallet::load(&test_config(&dir));

        assert!(!wallet.withdraw("USD", dec!(10001)).unwrap());
        assert_eq!(wallet.balance_of("USD"), dec!(10000));
    }

    #[test]
    fn test_balance_never_negative_over_sequence() {
        let dir = TempDir::new().unwrap();
        let mut wallet = PaperWallet::load(&test_config(&dir));

        let ops: [(&str, Decimal, bool); 5] = [
            ("USD", dec!(2500), false),
            ("USD", dec!(8000), false),
            ("USD", dec!(100), true),
            ("USD", dec!(7600), false),
            ("USD", dec!(0.01), false),
        ];
        for (asset, amount, is_deposit) in ops {
            if is_deposit {
                wallet.deposit(asset, amount).unwrap();
            } else {
                let _ = wallet.withdraw(asset, amount).unwrap();
            }
            assert!(wallet.balance_of(asset) >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let mut wallet = PaperWallet::load(&config);
        wallet.deposit("ETH", dec!(2.000000001)).unwrap();
        wallet.withdraw("USD", dec!(1234.56)).unwrap();
        let before = wallet.all_balances();

        let reloaded = PaperWallet::load(&config);
        assert_eq!(reloaded.all_balances(), before);
    }

    #[test]
    fn test_corrupt_file_reseeds() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::write(&config.file, "not json").unwrap();

        let wallet = PaperWallet::load(&config);
        assert_eq!(wallet.balance_of("USD"), dec!(10000));
    }

    #[test]
    fn test_all_balances_is_a_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut wallet = PaperWallet::load(&test_config(&dir));

        let mut snapshot = wallet.all_balances();
        snapshot.insert("USD".to_string(), dec!(0));
        assert_eq!(wallet.balance_of("USD"), dec!(10000));

        wallet.deposit("USD", dec!(1)).unwrap();
        assert_eq!(snapshot.get("USD"), Some(&dec!(0)));
    }

    #[test]
    fn test_total_value() {
        let dir = TempDir::new().unwrap();
        let mut wallet = PaperWallet::load(&test_config(&dir));
        wallet.deposit("BTC", dec!(0.5)).unwrap();

        let mut prices = HashMap::new();
        prices.insert("BTC".to_string(), dec!(50000));

        assert_eq!(wallet.total_value(&prices), dec!(35000));
    }
}
