//! Error types for the backtest harness.

use thiserror::Error;

/// Errors surfaced while loading data or running a replay.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no market data for product '{product}'")]
    MissingData { product: String },

    #[error("replay needs at least two snapshots")]
    EmptyReplay,

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BacktestError>;
