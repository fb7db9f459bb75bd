//! Building `TradingState` snapshots out of raw CSV rows.
//!
//! One state per timestamp, ascending, holding the book of every requested
//! product seen at that timestamp. Historical trades are merged into the
//! state whose timestamp matches exactly; trades with no matching snapshot
//! are dropped.

use std::collections::BTreeMap;

use types::{Listing, OrderDepth, Price, Symbol, Trade, TradingState};

use crate::error::{BacktestError, Result};
use crate::loader::{MarketRow, TradeRow};

/// Currency the sandbox products settle in.
pub const DENOMINATION: &str = "SEASHELLS";

fn depth_from_row(row: &MarketRow) -> OrderDepth {
    let mut depth = OrderDepth::new();
    for (price, volume) in row.bid_levels() {
        if volume as i64 != 0 {
            depth.set_bid_level(Price(price as i64), volume as i64);
        }
    }
    for (price, volume) in row.ask_levels() {
        if volume as i64 != 0 {
            depth.set_ask_level(Price(price as i64), volume as i64);
        }
    }
    depth
}

/// Build the replay state series.
///
/// `products` is the set the caller intends to trade; each must appear in
/// the market rows at least once or the build fails with `MissingData`.
pub fn build_states(
    market_rows: &[MarketRow],
    trade_rows: &[TradeRow],
    products: &[Symbol],
) -> Result<Vec<TradingState>> {
    for product in products {
        if !market_rows.iter().any(|r| &r.product == product) {
            return Err(BacktestError::MissingData {
                product: product.clone(),
            });
        }
    }

    // BTreeMap keys give ascending timestamp order.
    let mut grouped: BTreeMap<u64, Vec<&MarketRow>> = BTreeMap::new();
    for row in market_rows {
        grouped.entry(row.timestamp).or_default().push(row);
    }

    let mut states: Vec<TradingState> = grouped
        .into_iter()
        .map(|(timestamp, rows)| {
            let mut state = TradingState {
                timestamp,
                ..TradingState::default()
            };
            for row in rows {
                // First row wins if a product appears twice at one timestamp.
                if state.order_depths.contains_key(&row.product) {
                    continue;
                }
                state.listings.insert(
                    row.product.clone(),
                    Listing::new(row.product.clone(), row.product.clone(), DENOMINATION),
                );
                state
                    .order_depths
                    .insert(row.product.clone(), depth_from_row(row));
                state.position.insert(row.product.clone(), 0);
                state.own_trades.insert(row.product.clone(), Vec::new());
                state.market_trades.insert(row.product.clone(), Vec::new());
            }
            state
        })
        .collect();

    merge_trades(&mut states, trade_rows);
    tracing::info!(states = states.len(), trades = trade_rows.len(), "built replay states");
    Ok(states)
}

fn merge_trades(states: &mut [TradingState], trade_rows: &[TradeRow]) {
    let mut dropped = 0_usize;
    for row in trade_rows {
        let trade = Trade::new(
            row.symbol.clone(),
            Price(row.price as i64),
            row.quantity,
            row.buyer.clone(),
            row.seller.clone(),
            row.timestamp,
        );
        match states
            .binary_search_by_key(&row.timestamp, |s| s.timestamp)
            .ok()
            .map(|i| &mut states[i])
        {
            Some(state) => {
                state
                    .market_trades
                    .entry(row.symbol.clone())
                    .or_default()
                    .push(trade);
            }
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "trades without a matching snapshot");
    }
}
