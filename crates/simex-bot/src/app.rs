//! Application wiring.
//!
//! Builds the wallet and the paper executor from configuration and exposes
//! the operations the CLI drives. Construction validates the operating
//! mode: live trading has no implementation and must not be conflated with
//! the paper path.

use crate::config::{AppConfig, OperatingMode};
use crate::error::{AppError, AppResult};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use simex_core::{ExecutionOutcome, Fill, OrderBook, OrderSide, Size, TradeSignal, TradingPair};
use simex_executor::{estimate_price_impact, PaperExecutor};
use simex_wallet::PaperWallet;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Main application.
pub struct Application {
    config: AppConfig,
    wallet: Arc<Mutex<PaperWallet>>,
    executor: PaperExecutor,
}

impl Application {
    /// Create a new application.
    ///
    /// Fails with `LiveTradingUnsupported` when the config asks for live
    /// mode, and on invalid executor configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        if config.mode == OperatingMode::Live {
            return Err(AppError::LiveTradingUnsupported);
        }

        let wallet = Arc::new(Mutex::new(PaperWallet::load(&config.wallet)));
        let executor = PaperExecutor::new(config.executor.clone(), Arc::clone(&wallet))?;

        info!(mode = ?config.mode, wallet_file = %config.wallet.file.display(), "Application ready");
        Ok(Self {
            config,
            wallet,
            executor,
        })
    }

    /// Asset the wallet's capital is denominated in.
    pub fn base_currency(&self) -> &str {
        &self.config.wallet.base_currency
    }

    /// Snapshot of the wallet ledger.
    pub fn balances(&self) -> HashMap<String, Decimal> {
        self.wallet.lock().all_balances()
    }

    /// Total ledger value in the base currency at the given prices.
    pub fn portfolio_value(&self, prices: &HashMap<String, Decimal>) -> Decimal {
        self.wallet.lock().total_value(prices)
    }

    /// Execute a single paper order.
    pub async fn place_order(
        &self,
        signal: &TradeSignal,
        pair: &TradingPair,
        amount: Size,
        book: Option<&OrderBook>,
    ) -> AppResult<ExecutionOutcome> {
        Ok(self.executor.execute_order(signal, pair, amount, book).await?)
    }

    /// Place the 3-rung accumulation ladder.
    pub async fn place_ladder(
        &self,
        signal: &TradeSignal,
        pair: &TradingPair,
        total_amount: Size,
    ) -> AppResult<Option<Vec<Option<Fill>>>> {
        Ok(self
            .executor
            .execute_ladder(signal, pair, total_amount)
            .await?)
    }

    /// Estimate the price impact of a hypothetical trade. Read-only.
    pub fn estimate_impact(&self, book: &OrderBook, side: OrderSide, amount: Size) -> Decimal {
        estimate_price_impact(book, side, amount)
    }
}
