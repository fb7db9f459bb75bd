//! Backtest harness: CSV loading, state building, and the replay loop.
//!
//! The pipeline is `loader` (semicolon CSVs → typed rows) → `state_builder`
//! (rows → `TradingState` series) → `replay` (series + trader →
//! `BacktestReport`). `datagen` produces synthetic series for tests and
//! demos without any input files.

pub mod datagen;
pub mod error;
pub mod loader;
pub mod replay;
pub mod report;
pub mod state_builder;

pub use datagen::{SnapshotGenerator, SnapshotGeneratorConfig};
pub use error::{BacktestError, Result};
pub use loader::{load_market_csv, load_trades_csv, MarketRow, TradeRow};
pub use replay::{Backtester, SUBMISSION};
pub use report::{save_states, BacktestReport, TickRecord};
pub use state_builder::{build_states, DENOMINATION};
