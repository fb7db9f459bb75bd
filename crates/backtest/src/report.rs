//! Replay output: per-tick records, final PnL, JSON persistence.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use types::{Order, Symbol, Timestamp, Trade, TradingState};

use crate::error::Result;

/// What the trader did at one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub timestamp: Timestamp,
    /// Orders submitted this tick, per product.
    pub orders: HashMap<Symbol, Vec<Order>>,
    /// Positions after this tick's fills.
    pub positions: HashMap<Symbol, i64>,
}

/// Full result of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub ticks: Vec<TickRecord>,
    pub final_positions: HashMap<Symbol, i64>,
    pub own_trades: HashMap<Symbol, Vec<Trade>>,
    pub pnl_by_product: HashMap<Symbol, f64>,
}

impl BacktestReport {
    /// Number of own trades for one product.
    pub fn trade_count(&self, product: &str) -> usize {
        self.own_trades.get(product).map_or(0, Vec::len)
    }

    /// Total PnL across all products.
    pub fn total_pnl(&self) -> f64 {
        self.pnl_by_product.values().sum()
    }

    /// Write the report as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, self)?;
        tracing::info!(path = %path.display(), "report saved");
        Ok(())
    }
}

/// Per-product PnL: realized cash flow of every own trade plus the final
/// position marked at the last seen mid price.
pub fn compute_pnl(
    own_trades: &HashMap<Symbol, Vec<Trade>>,
    positions: &HashMap<Symbol, i64>,
    last_mids: &HashMap<Symbol, f64>,
) -> HashMap<Symbol, f64> {
    let mut pnl = HashMap::new();
    for (product, trades) in own_trades {
        let cash: i64 = trades.iter().map(Trade::cash_flow).sum();
        let position = positions.get(product).copied().unwrap_or(0);
        let mark = last_mids
            .get(product)
            .map(|mid| position as f64 * mid)
            .unwrap_or(0.0);
        pnl.insert(product.clone(), cash as f64 + mark);
    }
    pnl
}

/// Write a state series (initial or simulated) as pretty JSON.
pub fn save_states(states: &[TradingState], path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, states)?;
    tracing::info!(path = %path.display(), states = states.len(), "states saved");
    Ok(())
}
