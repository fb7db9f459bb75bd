//! Trend following on the short-term regression slope.
//!
//! Fits a least-squares line through the last few mid prices and goes with
//! the trend once the slope clears a threshold, committing the full
//! remaining capacity at the mid. Sizes are halved once inventory is heavy.

use quant::Momentum;
use types::{max_buyable, max_sellable, Order, Price};

use crate::memory::ProductMemory;
use crate::traits::{ProductStrategy, SnapshotContext};

/// Configuration for a [`MomentumRider`] strategy.
#[derive(Debug, Clone)]
pub struct MomentumRiderConfig {
    /// Product to trade.
    pub symbol: String,
    /// Hard position limit.
    pub position_limit: i64,
    /// Fair value used while the book is one-sided.
    pub default_fair_value: f64,
    /// Number of mid prices the slope is fit over.
    pub momentum_window: usize,
    /// Minimum absolute slope (ticks per snapshot) before entering.
    pub momentum_threshold: f64,
    /// Fraction of the limit beyond which order sizes are halved.
    pub soft_ratio: f64,
}

impl Default for MomentumRiderConfig {
    fn default() -> Self {
        Self {
            symbol: "SQUID_INK".to_string(),
            position_limit: 50,
            default_fair_value: 2_000.0,
            momentum_window: 5,
            momentum_threshold: 0.5,
            soft_ratio: 0.8,
        }
    }
}

/// Rides short-term trends with full remaining capacity.
pub struct MomentumRider {
    config: MomentumRiderConfig,
}

impl MomentumRider {
    pub fn new(config: MomentumRiderConfig) -> Self {
        Self { config }
    }
}

impl ProductStrategy for MomentumRider {
    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    fn position_limit(&self) -> i64 {
        self.config.position_limit
    }

    fn on_snapshot(&self, ctx: &SnapshotContext<'_>, memory: &mut ProductMemory) -> Vec<Order> {
        let mid = ctx
            .depth
            .mid_price()
            .unwrap_or(self.config.default_fair_value);

        let slope =
            Momentum::slope_from_prices(&memory.mids.to_vec(), self.config.momentum_window);
        let Some(slope) = slope else {
            return vec![];
        };
        if slope.abs() < self.config.momentum_threshold {
            return vec![];
        }

        let limit = ctx.position_limit;
        let mut quantity = if slope > 0.0 {
            max_buyable(limit, ctx.position)
        } else {
            -max_sellable(limit, ctx.position)
        };

        // Back off when inventory is already heavy.
        let soft_limit = (self.config.soft_ratio * limit as f64) as i64;
        if ctx.position.abs() > soft_limit {
            quantity = quantity.signum() * (quantity.abs() / 2);
        }

        if quantity == 0 {
            return vec![];
        }

        tracing::debug!(
            symbol = %self.config.symbol,
            timestamp = ctx.timestamp,
            slope,
            quantity,
            "riding trend"
        );
        vec![Order::new(
            self.config.symbol.clone(),
            Price::from_f64_round(mid),
            quantity,
        )]
    }
}
