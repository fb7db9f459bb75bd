//! The replay loop: immediate-fill simulation over a state series.
//!
//! Fill model: every order the trader emits fills in full at its limit
//! price, instantly. No partial fills, no queue position, no slippage, no
//! rejections. Position limits are the strategies' job; the replay applies
//! whatever it is given. Position, own trades, and `trader_data` are carried
//! forward from tick to tick.

use std::collections::HashMap;

use agents::Trader;
use types::{Symbol, Trade, TradingState};

use crate::error::{BacktestError, Result};
use crate::report::{compute_pnl, BacktestReport, TickRecord};

/// Counterparty label the sandbox uses for the trader's own fills.
pub const SUBMISSION: &str = "SUBMISSION";

/// Replays a historical state series through a trader.
pub struct Backtester {
    trader: Trader,
    simulated_states: Vec<TradingState>,
}

impl Backtester {
    pub fn new(trader: Trader) -> Self {
        Self {
            trader,
            simulated_states: Vec::new(),
        }
    }

    /// The state series as the trader saw it, fills applied.
    ///
    /// Populated by [`Backtester::run`]; useful for JSON dumps.
    pub fn simulated_states(&self) -> &[TradingState] {
        &self.simulated_states
    }

    /// Run the replay. States must be in ascending timestamp order (the
    /// state builder guarantees this).
    pub fn run(&mut self, states: &[TradingState]) -> Result<BacktestReport> {
        if states.len() < 2 {
            return Err(BacktestError::EmptyReplay);
        }
        tracing::info!(states = states.len(), "starting replay");

        let mut simulated = states[0].clone();
        let mut last_mids: HashMap<Symbol, f64> = HashMap::new();
        let mut ticks = Vec::with_capacity(states.len() - 1);
        self.simulated_states.clear();
        self.simulated_states.push(simulated.clone());

        for next in &states[1..] {
            record_mids(&simulated, &mut last_mids);

            let output = self.trader.run(&simulated);
            for (product, orders) in &output.orders {
                for order in orders {
                    *simulated.position.entry(product.clone()).or_insert(0) += order.quantity;
                    let (buyer, seller) = if order.is_buy() {
                        (SUBMISSION, "")
                    } else {
                        ("", SUBMISSION)
                    };
                    simulated
                        .own_trades
                        .entry(product.clone())
                        .or_default()
                        .push(Trade::new(
                            product.clone(),
                            order.price,
                            order.quantity,
                            buyer,
                            seller,
                            simulated.timestamp,
                        ));
                }
            }

            ticks.push(TickRecord {
                timestamp: simulated.timestamp,
                orders: output.orders,
                positions: simulated.position.clone(),
            });
            tracing::debug!(
                timestamp = simulated.timestamp,
                orders = ticks.last().map_or(0, |t| t.orders.len()),
                "tick replayed"
            );

            // Carry fills and memory into the next historical snapshot.
            let mut next_state = next.clone();
            next_state.position = simulated.position.clone();
            next_state.own_trades = simulated.own_trades.clone();
            next_state.trader_data = output.trader_data;
            self.simulated_states.push(next_state.clone());
            simulated = next_state;
        }
        record_mids(&simulated, &mut last_mids);

        let report = BacktestReport {
            pnl_by_product: compute_pnl(&simulated.own_trades, &simulated.position, &last_mids),
            final_positions: simulated.position,
            own_trades: simulated.own_trades,
            ticks,
        };
        tracing::info!(total_pnl = report.total_pnl(), "replay finished");
        Ok(report)
    }
}

fn record_mids(state: &TradingState, last_mids: &mut HashMap<Symbol, f64>) {
    for (product, depth) in &state.order_depths {
        if let Some(mid) = depth.mid_price() {
            last_mids.insert(product.clone(), mid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agents::{FairValueQuoter, FairValueQuoterConfig, ProductStrategy, SnapshotContext};
    use types::{Order, OrderDepth, Price};

    /// Buys one unit at the best ask every tick.
    struct OneLotTaker;

    impl ProductStrategy for OneLotTaker {
        fn symbol(&self) -> &str {
            "KELP"
        }

        fn position_limit(&self) -> i64 {
            50
        }

        fn on_snapshot(
            &self,
            ctx: &SnapshotContext<'_>,
            _memory: &mut agents::ProductMemory,
        ) -> Vec<Order> {
            match ctx.depth.best_ask() {
                Some(ask) => vec![Order::buy("KELP", ask, 1)],
                None => vec![],
            }
        }
    }

    fn kelp_state(timestamp: u64, bid: i64, ask: i64) -> TradingState {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(bid), 20);
        depth.set_ask_level(Price(ask), 20);
        let mut state = TradingState {
            timestamp,
            ..TradingState::default()
        };
        state.order_depths.insert("KELP".to_string(), depth);
        state.position.insert("KELP".to_string(), 0);
        state.own_trades.insert("KELP".to_string(), Vec::new());
        state
    }

    fn series(n: u64) -> Vec<TradingState> {
        (0..n).map(|i| kelp_state(i * 100, 1_999, 2_001)).collect()
    }

    #[test]
    fn test_replay_needs_two_states() {
        let mut backtester = Backtester::new(Trader::new(vec![Box::new(OneLotTaker)]));
        let err = backtester.run(&series(1)).unwrap_err();
        assert!(matches!(err, BacktestError::EmptyReplay));
    }

    #[test]
    fn test_fills_accumulate_position_and_trades() {
        let mut backtester = Backtester::new(Trader::new(vec![Box::new(OneLotTaker)]));
        let report = backtester.run(&series(4)).unwrap();

        // 3 decision ticks (last state is never traded on).
        assert_eq!(report.ticks.len(), 3);
        assert_eq!(report.final_positions["KELP"], 3);
        assert_eq!(report.trade_count("KELP"), 3);

        let trades = &report.own_trades["KELP"];
        assert_eq!(trades[0].buyer, SUBMISSION);
        assert_eq!(trades[0].timestamp, 0);
        assert_eq!(trades[2].timestamp, 200);
    }

    #[test]
    fn test_positions_carried_into_next_tick() {
        let mut backtester = Backtester::new(Trader::new(vec![Box::new(OneLotTaker)]));
        backtester.run(&series(3)).unwrap();

        let states = backtester.simulated_states();
        assert_eq!(states.len(), 3);
        assert_eq!(states[1].position_for("KELP"), 1);
        assert_eq!(states[2].position_for("KELP"), 2);
        // Memory string was carried forward too.
        assert!(!states[1].trader_data.is_empty());
    }

    #[test]
    fn test_pnl_marks_open_position_at_last_mid() {
        let mut backtester = Backtester::new(Trader::new(vec![Box::new(OneLotTaker)]));
        let report = backtester.run(&series(3)).unwrap();

        // Bought 2 @ 2001, marked at mid 2000: -2 ticks.
        assert_eq!(report.pnl_by_product["KELP"], -2.0);
    }

    #[test]
    fn test_full_quoter_replay_stays_within_limit() {
        let trader = Trader::new(vec![Box::new(FairValueQuoter::new(
            FairValueQuoterConfig::kelp(),
        ))]);
        let mut backtester = Backtester::new(trader);

        // Drifting book: quotes will fill every tick in both directions.
        let states: Vec<TradingState> = (0..20)
            .map(|i| kelp_state(i * 100, 1_998 + (i as i64 % 3), 2_002 + (i as i64 % 3)))
            .collect();
        let report = backtester.run(&states).unwrap();

        for tick in &report.ticks {
            let position = tick.positions["KELP"];
            assert!(
                position.abs() <= 100,
                "position {position} at {} breached twice the limit",
                tick.timestamp
            );
        }
        assert!(report.trade_count("KELP") > 0);
    }
}
