//! The paper execution engine.
//!
//! Each call runs to completion: rate-limit check, signal validation,
//! simulated network latency, price discovery, then settlement against the
//! wallet as one critical section. The wallet primitive is check-then-act,
//! so the whole settlement sequence (balance check + mutation) must run
//! under the wallet mutex; engines sharing a wallet rely on that boundary
//! for the no-negative-balance invariant.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use simex_core::{
    ExecutionOutcome, Fill, OrderBook, OrderSide, Price, RejectReason, Size, TradeSignal,
    TradingPair,
};
use simex_wallet::PaperWallet;

use crate::config::ExecutorConfig;
use crate::error::ExecutorResult;
use crate::ladder::LADDER_RUNGS;
use crate::pricing;

/// Where an execution call gets its price from.
enum PriceSource<'a> {
    Book(&'a OrderBook),
    Flat(Price),
}

/// Paper-trading execution engine.
///
/// Owns its rate-limit clock (one timestamp per instance) and settles
/// exclusively against the shared wallet. Live order submission is a
/// distinct, not-yet-specified mode and deliberately has no entry point
/// here.
pub struct PaperExecutor {
    config: ExecutorConfig,
    wallet: Arc<Mutex<PaperWallet>>,
    /// Unix-ms timestamp of the last successful settlement. Zero until the
    /// first fill.
    last_trade_ms: AtomicU64,
}

impl PaperExecutor {
    /// Create an engine over a shared wallet.
    ///
    /// Configuration problems (negative fee/slippage, inverted latency
    /// range) are fatal here, never deferred to the first call.
    pub fn new(config: ExecutorConfig, wallet: Arc<Mutex<PaperWallet>>) -> ExecutorResult<Self> {
        config.validate()?;
        info!(
            slippage_pct = %config.slippage_pct,
            fee_pct = %config.fee_pct,
            min_trade_interval_ms = config.min_trade_interval_ms,
            "Paper executor initialized"
        );
        Ok(Self {
            config,
            wallet,
            last_trade_ms: AtomicU64::new(0),
        })
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Check the inter-trade throttle at the given timestamp.
    ///
    /// Does not advance the clock; only a successful settlement does.
    pub(crate) fn rate_limited_at(&self, now_ms: u64) -> bool {
        let last = self.last_trade_ms.load(Ordering::Acquire);
        now_ms.saturating_sub(last) < self.config.min_trade_interval_ms
    }

    fn touch_rate_limit(&self) {
        self.last_trade_ms.store(Self::now_ms(), Ordering::Release);
    }

    /// Execute a single order against the paper wallet.
    ///
    /// With an order book supplied the relevant side is walked for a
    /// realistic depth-weighted price; without one the signal's reference
    /// price is shifted by the configured flat slippage. Routine trading
    /// conditions come back as `ExecutionOutcome::Rejected`.
    pub async fn execute_order(
        &self,
        signal: &TradeSignal,
        pair: &TradingPair,
        amount: Size,
        book: Option<&OrderBook>,
    ) -> ExecutorResult<ExecutionOutcome> {
        if self.rate_limited_at(Self::now_ms()) {
            warn!(%pair, "Trade skipped due to rate limiting");
            return Ok(ExecutionOutcome::Rejected(RejectReason::RateLimited));
        }

        info!(side = %signal.side, %amount, %pair, "Executing order");

        let outcome = self
            .paper_fill(
                signal.side,
                pair,
                amount,
                signal.price,
                book,
                signal.strategy.clone(),
            )
            .await?;

        if outcome.is_filled() {
            self.touch_rate_limit();
        }
        Ok(outcome)
    }

    /// Execute the fixed 3-rung accumulation ladder over `total_amount`.
    ///
    /// Each rung is a resting limit order settled independently through the
    /// flat-slippage path (no book walk), so one rung failing never blocks
    /// the others. The returned sequence preserves per-rung gaps; `None`
    /// means every rung failed. A ladder with at least one fill counts as
    /// one settlement for the rate-limit clock.
    pub async fn execute_ladder(
        &self,
        signal: &TradeSignal,
        pair: &TradingPair,
        total_amount: Size,
    ) -> ExecutorResult<Option<Vec<Option<Fill>>>> {
        let Some(reference) = signal.price else {
            warn!(%pair, "Ladder order requires a reference price");
            return Ok(None);
        };
        if !total_amount.is_positive() {
            warn!(%pair, %total_amount, "Ladder order requires a positive amount");
            return Ok(None);
        }

        let mut rungs = Vec::with_capacity(LADDER_RUNGS.len());
        for (i, rung) in LADDER_RUNGS.iter().enumerate() {
            let rung_amount = rung.amount(total_amount);
            let rung_price = rung.price(reference);
            info!(
                rung = i + 1,
                amount = %rung_amount,
                price = %rung_price,
                %pair,
                "Placing ladder limit buy"
            );

            let outcome = self
                .paper_fill(
                    OrderSide::Buy,
                    pair,
                    rung_amount,
                    Some(rung_price),
                    None,
                    signal.strategy.clone(),
                )
                .await?;

            match outcome {
                ExecutionOutcome::Filled(fill) => rungs.push(Some(fill)),
                ExecutionOutcome::Rejected(reason) => {
                    warn!(rung = i + 1, %reason, "Ladder rung failed");
                    rungs.push(None);
                }
            }
        }

        if rungs.iter().all(Option::is_none) {
            return Ok(None);
        }
        self.touch_rate_limit();
        Ok(Some(rungs))
    }

    /// Price, fee and settle one order. Shared by the single-order path and
    /// each ladder rung.
    async fn paper_fill(
        &self,
        side: OrderSide,
        pair: &TradingPair,
        amount: Size,
        reference: Option<Price>,
        book: Option<&OrderBook>,
        strategy: Option<String>,
    ) -> ExecutorResult<ExecutionOutcome> {
        if !amount.is_positive() {
            warn!(%amount, "Rejecting order with non-positive amount");
            return Ok(ExecutionOutcome::Rejected(RejectReason::InvalidSignal));
        }
        let source = match (book, reference) {
            (Some(book), _) => PriceSource::Book(book),
            (None, Some(reference)) => PriceSource::Flat(reference),
            (None, None) => {
                warn!("Paper trade requires a reference price or an order book");
                return Ok(ExecutionOutcome::Rejected(RejectReason::InvalidSignal));
            }
        };

        self.simulate_latency().await;

        let exec_price = match source {
            PriceSource::Book(book) => {
                let Some(walked) = pricing::walk_book(book.side_levels(side), side, amount) else {
                    warn!(%side, %pair, "Order book side is empty, nothing to price against");
                    return Ok(ExecutionOutcome::Rejected(RejectReason::NoLiquidity));
                };
                if let Some(penalty) = walked.penalty_price {
                    warn!(
                        unfilled = %walked.unfilled,
                        penalty_price = %penalty,
                        "Order exceeds book depth, filling remainder at penalty price"
                    );
                }
                if let Some(impact) = reference.and_then(|r| walked.price.pct_from(r)) {
                    debug!(depth_impact_pct = %impact.abs(), "Book-walk price impact");
                }
                walked.price
            }
            PriceSource::Flat(reference) => {
                pricing::flat_slippage_price(reference, side, self.config.slippage_pct)
            }
        };

        self.settle(side, pair, amount, exec_price, strategy)
    }

    /// Settle a priced order against the wallet.
    ///
    /// The entire check-then-act sequence runs under the wallet mutex; there
    /// is no cancellation point inside it.
    fn settle(
        &self,
        side: OrderSide,
        pair: &TradingPair,
        amount: Size,
        exec_price: Price,
        strategy: Option<String>,
    ) -> ExecutorResult<ExecutionOutcome> {
        let gross = amount.notional(exec_price);
        let fee_frac = self.config.fee_pct / Decimal::ONE_HUNDRED;

        let mut wallet = self.wallet.lock();
        match side {
            OrderSide::Buy => {
                // Fee inflates the quote cost paid.
                let total_cost = gross * (Decimal::ONE + fee_frac);
                if !wallet.withdraw(pair.quote(), total_cost)? {
                    let available = wallet.balance_of(pair.quote());
                    warn!(
                        %pair,
                        needed = %total_cost,
                        %available,
                        "Insufficient funds for paper buy"
                    );
                    return Ok(ExecutionOutcome::Rejected(RejectReason::InsufficientFunds {
                        needed: total_cost,
                        available,
                    }));
                }
                wallet.deposit(pair.base(), amount.inner())?;
                drop(wallet);

                info!(
                    %pair,
                    %amount,
                    price = %exec_price,
                    cost = %total_cost,
                    fee_pct = %self.config.fee_pct,
                    "Paper buy filled"
                );
                Ok(ExecutionOutcome::Filled(Fill::paper(
                    pair.clone(),
                    side,
                    amount,
                    exec_price,
                    total_cost,
                    strategy,
                )))
            }
            OrderSide::Sell => {
                // Fee deflates the quote proceeds received.
                let proceeds = gross * (Decimal::ONE - fee_frac);
                if !wallet.withdraw(pair.base(), amount.inner())? {
                    let available = wallet.balance_of(pair.base());
                    warn!(
                        %pair,
                        needed = %amount,
                        %available,
                        "Insufficient funds for paper sell"
                    );
                    return Ok(ExecutionOutcome::Rejected(RejectReason::InsufficientFunds {
                        needed: amount.inner(),
                        available,
                    }));
                }
                wallet.deposit(pair.quote(), proceeds)?;
                drop(wallet);

                info!(
                    %pair,
                    %amount,
                    price = %exec_price,
                    %proceeds,
                    fee_pct = %self.config.fee_pct,
                    "Paper sell filled"
                );
                Ok(ExecutionOutcome::Filled(Fill::paper(
                    pair.clone(),
                    side,
                    amount,
                    exec_price,
                    proceeds,
                    strategy,
                )))
            }
        }
    }

    /// Sleep for a uniformly sampled network round-trip before settlement.
    ///
    /// Runs before the wallet lock is taken; settlement itself never awaits.
    async fn simulate_latency(&self) {
        let (min, max) = (self.config.latency_min_ms, self.config.latency_max_ms);
        if max == 0 {
            return;
        }
        let span = max - min;
        let ms = if span == 0 {
            min
        } else {
            min + jitter_ms() % (span + 1)
        };
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Sample millisecond jitter from the subsecond clock.
fn jitter_ms() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    nanos as u64
}
