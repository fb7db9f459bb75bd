//! Tidepool - sandbox trader backtest runner.
//!
//! Loads historical price (and optionally trade) CSVs, replays them through
//! the chosen strategy family, and prints a per-product summary. Optional
//! JSON dumps of the full report and the simulated state series.
//!
//! ```text
//! tidepool --prices data/prices_day_0.csv --trades data/trades_day_0.csv \
//!          --strategy fair-value --report report.json
//! ```

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use backtest::{build_states, load_market_csv, load_trades_csv, save_states, Backtester};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{build_trader, StrategyKind, SANDBOX_PRODUCTS};

/// Tidepool - market-making sandbox trader with a CSV backtest harness
#[derive(Parser, Debug)]
#[command(name = "tidepool")]
#[command(about = "Replay historical market data through a sandbox trading strategy")]
#[command(version)]
struct Args {
    /// Prices CSV (semicolon-delimited, one book snapshot per row)
    #[arg(long, env = "TIDEPOOL_PRICES")]
    prices: PathBuf,

    /// Trades CSV (optional; merged into snapshots by timestamp)
    #[arg(long, env = "TIDEPOOL_TRADES")]
    trades: Option<PathBuf>,

    /// Product to trade (repeatable; defaults to the three sandbox products)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Strategy family to run on every product
    #[arg(long, value_enum, default_value = "fair-value")]
    strategy: StrategyKind,

    /// Write the full backtest report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the simulated state series (fills applied) as JSON
    #[arg(long)]
    states: Option<PathBuf>,

    /// Write the initial state series (as built from the CSVs) as JSON
    #[arg(long)]
    initial_states: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "backtest failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> backtest::Result<()> {
    let products: Vec<String> = if args.products.is_empty() {
        SANDBOX_PRODUCTS.iter().map(|p| p.to_string()).collect()
    } else {
        args.products.clone()
    };

    let market_rows = load_market_csv(&args.prices, &products)?;
    let trade_rows = match &args.trades {
        Some(path) => load_trades_csv(path, &products)?,
        None => Vec::new(),
    };
    let states = build_states(&market_rows, &trade_rows, &products)?;

    let trader = build_trader(args.strategy, &products);
    let mut backtester = Backtester::new(trader);
    let report = backtester.run(&states)?;

    if let Some(path) = &args.initial_states {
        save_states(&states, path)?;
    }

    if let Some(path) = &args.states {
        save_states(backtester.simulated_states(), path)?;
    }
    if let Some(path) = &args.report {
        report.save(path)?;
    }

    print_summary(&report, &products, args.strategy);
    Ok(())
}

fn print_summary(
    report: &backtest::BacktestReport,
    products: &[String],
    strategy: StrategyKind,
) {
    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║  Tidepool Backtest - strategy: {:<28} ║", format!("{strategy:?}"));
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!("║  {:<18} {:>8} {:>12} {:>16}    ║", "Product", "Trades", "Position", "PnL");
    for product in products {
        eprintln!(
            "║  {:<18} {:>8} {:>12} {:>16.1}    ║",
            product,
            report.trade_count(product),
            report.final_positions.get(product).copied().unwrap_or(0),
            report.pnl_by_product.get(product).copied().unwrap_or(0.0),
        );
    }
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Ticks: {:>6}                        Total PnL: {:>10.1}    ║",
        report.ticks.len(),
        report.total_pnl(),
    );
    eprintln!("╚══════════════════════════════════════════════════════════════╝");
}
