//! The `ProductStrategy` trait and the trader loop that drives it.
//!
//! A strategy decides orders for exactly one product. The [`Trader`] fans a
//! `TradingState` snapshot out to its strategies, collects their orders, and
//! serializes rolling state back into `trader_data` for the next tick.

use std::collections::HashMap;

use types::{Order, OrderDepth, Symbol, Timestamp, TradingState};

use crate::memory::{ProductMemory, TraderMemory};

/// Read-only view of one product's slice of a tick.
///
/// Borrows from the `TradingState`, so strategies extract what they need
/// during `on_snapshot` and never hold on to it.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotContext<'a> {
    /// Current resting depth for the product.
    pub depth: &'a OrderDepth,
    /// Signed position going into this tick.
    pub position: i64,
    /// Hard position limit for the product.
    pub position_limit: i64,
    /// Snapshot timestamp.
    pub timestamp: Timestamp,
}

/// Per-product trading strategy.
///
/// Called once per tick for its product. The strategy owns no mutable state
/// of its own; everything that must survive the tick lives in the
/// [`ProductMemory`] it is handed.
pub trait ProductStrategy: Send {
    /// Product this strategy trades.
    fn symbol(&self) -> &str;

    /// Hard position limit enforced by the exchange.
    fn position_limit(&self) -> i64;

    /// Decide orders for this tick.
    fn on_snapshot(&self, ctx: &SnapshotContext<'_>, memory: &mut ProductMemory) -> Vec<Order>;
}

/// Everything a trader hands back to the sandbox for one tick.
#[derive(Debug, Clone, Default)]
pub struct TraderOutput {
    /// Orders per product.
    pub orders: HashMap<Symbol, Vec<Order>>,
    /// Conversion requests (unused by the sandbox products here).
    pub conversions: i64,
    /// Serialized memory, round-tripped by the sandbox.
    pub trader_data: String,
}

/// A trader: one strategy per product plus memory plumbing.
pub struct Trader {
    strategies: Vec<Box<dyn ProductStrategy>>,
}

impl Trader {
    /// Create a trader from a set of per-product strategies.
    pub fn new(strategies: Vec<Box<dyn ProductStrategy>>) -> Self {
        Self { strategies }
    }

    /// Symbols this trader quotes.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.strategies
            .iter()
            .map(|s| s.symbol().to_string())
            .collect()
    }

    /// Run one tick: decode memory, consult every strategy whose product has
    /// a depth snapshot, re-encode memory.
    pub fn run(&mut self, state: &TradingState) -> TraderOutput {
        let mut memory = TraderMemory::decode(&state.trader_data);
        let mut orders: HashMap<Symbol, Vec<Order>> = HashMap::new();

        for strategy in &self.strategies {
            let symbol = strategy.symbol();
            let Some(depth) = state.depth_for(symbol) else {
                tracing::debug!(symbol, timestamp = state.timestamp, "no depth this tick");
                continue;
            };

            let product_memory = memory.product(symbol);
            product_memory.push_mid(depth.mid_price());

            let ctx = SnapshotContext {
                depth,
                position: state.position_for(symbol),
                position_limit: strategy.position_limit(),
                timestamp: state.timestamp,
            };
            let product_orders = strategy.on_snapshot(&ctx, product_memory);
            if !product_orders.is_empty() {
                orders.insert(symbol.to_string(), product_orders);
            }
        }

        TraderOutput {
            orders,
            conversions: 0,
            trader_data: memory.encode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Price;

    struct PassiveBidder {
        symbol: Symbol,
    }

    impl ProductStrategy for PassiveBidder {
        fn symbol(&self) -> &str {
            &self.symbol
        }

        fn position_limit(&self) -> i64 {
            50
        }

        fn on_snapshot(&self, ctx: &SnapshotContext<'_>, _memory: &mut ProductMemory) -> Vec<Order> {
            assert_eq!(ctx.position_limit, 50);
            match ctx.depth.best_bid() {
                Some(bid) => vec![Order::buy(self.symbol.clone(), bid, 1)],
                None => vec![],
            }
        }
    }

    fn state_with_depth(symbol: &str) -> TradingState {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(1999), 10);
        depth.set_ask_level(Price(2001), 10);
        let mut state = TradingState::default();
        state.order_depths.insert(symbol.to_string(), depth);
        state
    }

    #[test]
    fn test_trader_collects_orders_per_symbol() {
        let mut trader = Trader::new(vec![Box::new(PassiveBidder {
            symbol: "KELP".to_string(),
        })]);
        let state = state_with_depth("KELP");
        let output = trader.run(&state);

        assert_eq!(output.orders["KELP"].len(), 1);
        assert_eq!(output.orders["KELP"][0].price, Price(1999));
        assert_eq!(output.conversions, 0);
    }

    #[test]
    fn test_trader_skips_missing_depth() {
        let mut trader = Trader::new(vec![Box::new(PassiveBidder {
            symbol: "SQUID_INK".to_string(),
        })]);
        let state = state_with_depth("KELP");
        let output = trader.run(&state);
        assert!(output.orders.is_empty());
    }

    #[test]
    fn test_trader_memory_round_trips() {
        let mut trader = Trader::new(vec![Box::new(PassiveBidder {
            symbol: "KELP".to_string(),
        })]);
        let mut state = state_with_depth("KELP");

        let out1 = trader.run(&state);
        state.trader_data = out1.trader_data;
        let out2 = trader.run(&state);

        let memory = TraderMemory::decode(&out2.trader_data);
        assert_eq!(memory.products["KELP"].mids.len(), 2);
    }
}
