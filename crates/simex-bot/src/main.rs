//! simex paper-trading bot - Entry Point
//!
//! Manual driver for the paper execution engine: place single orders,
//! ladders, inspect balances and estimate price impact from the command
//! line. Order-book snapshots are supplied as JSON files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use simex_core::{ExecutionOutcome, OrderBook, OrderSide, Price, Size, TradeSignal, TradingPair};
use std::path::{Path, PathBuf};
use tracing::info;

/// simex paper-trading bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SIMEX_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the wallet ledger
    Balances,
    /// Execute a single paper order
    Order {
        /// Trading pair, e.g. BTC/USD
        #[arg(long)]
        symbol: TradingPair,
        /// Order side: buy or sell
        #[arg(long)]
        side: OrderSide,
        /// Base-asset amount
        #[arg(long)]
        amount: Size,
        /// Reference price; required unless --book is given
        #[arg(long)]
        price: Option<Price>,
        /// Path to an order-book JSON snapshot for depth-based pricing
        #[arg(long)]
        book: Option<PathBuf>,
        /// Strategy tag recorded on the fill
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Place the 3-rung accumulation ladder
    Ladder {
        /// Trading pair, e.g. BTC/USD
        #[arg(long)]
        symbol: TradingPair,
        /// Total base-asset amount split across the rungs
        #[arg(long)]
        amount: Size,
        /// Reference price the rung offsets apply to
        #[arg(long)]
        price: Price,
        /// Strategy tag recorded on the fills
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Estimate price impact against an order-book snapshot (read-only)
    Impact {
        /// Order side: buy or sell
        #[arg(long)]
        side: OrderSide,
        /// Base-asset amount
        #[arg(long)]
        amount: Size,
        /// Path to an order-book JSON snapshot
        #[arg(long)]
        book: PathBuf,
    },
}

fn read_book(path: &Path) -> Result<OrderBook> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    simex_telemetry::init_logging()?;
    info!("Starting simex v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => simex_bot::AppConfig::from_file(path)?,
        None => simex_bot::AppConfig::load()?,
    };

    let app = simex_bot::Application::new(config)?;

    match args.command {
        Command::Balances => {
            let mut entries: Vec<_> = app.balances().into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (asset, balance) in entries {
                println!("{asset}: {balance}");
            }
        }
        Command::Order {
            symbol,
            side,
            amount,
            price,
            book,
            strategy,
        } => {
            let snapshot = book.as_deref().map(read_book).transpose()?;
            let mut signal = match price {
                Some(price) => TradeSignal::new(side, price),
                None => TradeSignal::market(side),
            };
            if let Some(tag) = strategy {
                signal = signal.with_strategy(tag);
            }

            let outcome = app
                .place_order(&signal, &symbol, amount, snapshot.as_ref())
                .await?;
            match outcome {
                ExecutionOutcome::Filled(fill) => println!(
                    "filled {} {} {} @ {} ({} {} moved, id {})",
                    fill.side,
                    fill.amount,
                    fill.pair,
                    fill.price,
                    fill.value,
                    app.base_currency(),
                    fill.id
                ),
                ExecutionOutcome::Rejected(reason) => println!("rejected: {reason}"),
            }
        }
        Command::Ladder {
            symbol,
            amount,
            price,
            strategy,
        } => {
            let mut signal = TradeSignal::new(OrderSide::Buy, price);
            if let Some(tag) = strategy {
                signal = signal.with_strategy(tag);
            }

            match app.place_ladder(&signal, &symbol, amount).await? {
                Some(rungs) => {
                    for (i, rung) in rungs.iter().enumerate() {
                        match rung {
                            Some(fill) => println!(
                                "rung {}: filled {} @ {} (value {})",
                                i + 1,
                                fill.amount,
                                fill.price,
                                fill.value
                            ),
                            None => println!("rung {}: not filled", i + 1),
                        }
                    }
                }
                None => println!("no rung filled"),
            }
        }
        Command::Impact { side, amount, book } => {
            let snapshot = read_book(&book)?;
            let impact = app.estimate_impact(&snapshot, side, amount);
            println!("estimated price impact: {impact}");
        }
    }

    Ok(())
}
