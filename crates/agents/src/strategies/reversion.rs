//! Mean reversion at Bollinger band extremes, confirmed by RSI.
//!
//! When the mid pierces the lower band *and* RSI agrees the product is
//! oversold, the strategy buys at the mid, sized by how deep the pierce is
//! relative to volatility; symmetric for the upper band when overbought.
//! Shallow pierces below the trade threshold are ignored, and sizes are
//! halved once inventory gets heavy.

use quant::{BollingerBands, Rsi};
use types::{max_buyable, max_sellable, Order, Price};

use crate::memory::ProductMemory;
use crate::traits::{ProductStrategy, SnapshotContext};

/// Configuration for a [`BandReversion`] strategy.
#[derive(Debug, Clone)]
pub struct BandReversionConfig {
    /// Product to trade.
    pub symbol: String,
    /// Hard position limit.
    pub position_limit: i64,
    /// Fair value used while the book is one-sided.
    pub default_fair_value: f64,
    /// Band half-width in standard deviations.
    pub bollinger_multiplier: f64,
    /// Minimum normalized pierce depth before trading.
    pub min_trade_threshold: f64,
    /// RSI lookback period.
    pub rsi_period: usize,
    /// Buying requires RSI below this (oversold confirmation).
    pub rsi_oversold: f64,
    /// Selling requires RSI above this (overbought confirmation).
    pub rsi_overbought: f64,
    /// Fraction of the limit beyond which order sizes are halved.
    pub soft_ratio: f64,
}

impl Default for BandReversionConfig {
    fn default() -> Self {
        Self {
            symbol: "KELP".to_string(),
            position_limit: 50,
            default_fair_value: 2_000.0,
            bollinger_multiplier: 1.5,
            min_trade_threshold: 0.2,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            soft_ratio: 0.8,
        }
    }
}

/// Buys oversold pierces of the lower band, sells overbought pierces of the
/// upper band.
pub struct BandReversion {
    config: BandReversionConfig,
}

impl BandReversion {
    pub fn new(config: BandReversionConfig) -> Self {
        Self { config }
    }
}

impl ProductStrategy for BandReversion {
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

        let history = memory.mids.to_vec();
        let Some(bands) = BollingerBands::new(self.config.bollinger_multiplier).calculate(&history)
        else {
            return vec![];
        };
        let rsi = Rsi::calculate_from_prices(&history, self.config.rsi_period);
        let unit = if bands.std_dev > 0.0 { bands.std_dev } else { 1.0 };

        let limit = ctx.position_limit;
        let price = Price::from_f64_round(mid);
        let mut quantity = 0_i64;

        if mid < bands.lower && rsi < self.config.rsi_oversold {
            let factor = (bands.lower - mid) / unit;
            if factor > self.config.min_trade_threshold {
                let allowed = max_buyable(limit, ctx.position);
                quantity = (allowed as f64 * factor.min(1.0)) as i64;
            }
        } else if mid > bands.upper && rsi > self.config.rsi_overbought {
            let factor = (mid - bands.upper) / unit;
            if factor > self.config.min_trade_threshold {
                let allowed = max_sellable(limit, ctx.position);
                quantity = -((allowed as f64 * factor.min(1.0)) as i64);
            }
        }

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
            mid,
            lower = bands.lower,
            upper = bands.upper,
            rsi,
            quantity,
            "band reversion entry"
        );
        vec![Order::new(self.config.symbol.clone(), price, quantity)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::OrderDepth;

    fn depth_with_mid(mid: i64) -> OrderDepth {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(mid - 1), 20);
        depth.set_ask_level(Price(mid + 1), 20);
        depth
    }

    fn ctx(depth: &OrderDepth, position: i64) -> SnapshotContext<'_> {
        SnapshotContext {
            depth,
            position,
            position_limit: 50,
            timestamp: 0,
        }
    }

    /// History that drifts down into the current tick so RSI reads oversold
    /// while keeping a non-trivial std dev.
    fn falling_memory() -> ProductMemory {
        let mut memory = ProductMemory::default();
        for i in 0..20 {
            memory.push_mid(Some(2_010.0 - i as f64));
        }
        memory
    }

    fn rising_memory() -> ProductMemory {
        let mut memory = ProductMemory::default();
        for i in 0..20 {
            memory.push_mid(Some(1_990.0 + i as f64));
        }
        memory
    }

    #[test]
    fn test_oversold_pierce_buys_at_mid() {
        let strategy = BandReversion::new(BandReversionConfig::default());
        let mut memory = falling_memory();
        // Far below the lower band (~1991 for this history).
        let depth = depth_with_mid(1_960);
        let orders = strategy.on_snapshot(&ctx(&depth, 0), &mut memory);

        assert_eq!(orders.len(), 1);
        assert!(orders[0].is_buy());
        assert_eq!(orders[0].price, Price(1_960));
        // Deep pierce: full allowed size.
        assert_eq!(orders[0].quantity, 50);
    }

    #[test]
    fn test_overbought_pierce_sells_at_mid() {
        let strategy = BandReversion::new(BandReversionConfig::default());
        let mut memory = rising_memory();
        let depth = depth_with_mid(2_040);
        let orders = strategy.on_snapshot(&ctx(&depth, 10), &mut memory);

        assert_eq!(orders.len(), 1);
        assert!(orders[0].is_sell());
        assert_eq!(orders[0].abs_quantity(), 60);
    }

    #[test]
    fn test_pierce_without_rsi_confirmation_is_silent() {
        let strategy = BandReversion::new(BandReversionConfig::default());
        // Rising history: RSI = 100, so a lower-band pierce must not buy.
        let mut memory = rising_memory();
        let depth = depth_with_mid(1_960);
        assert!(strategy.on_snapshot(&ctx(&depth, 0), &mut memory).is_empty());
    }

    #[test]
    fn test_inside_bands_is_silent() {
        let strategy = BandReversion::new(BandReversionConfig::default());
        let mut memory = falling_memory();
        let depth = depth_with_mid(2_000);
        assert!(strategy.on_snapshot(&ctx(&depth, 0), &mut memory).is_empty());
    }

    #[test]
    fn test_shallow_pierce_below_threshold_is_silent() {
        let strategy = BandReversion::new(BandReversionConfig::default());
        let mut memory = falling_memory();

        // Pierce by ~0.1 std: below the 0.2 trade threshold.
        let std = memory.mids.std_dev().unwrap();
        let mean = memory.mids.mean().unwrap();
        let mid = (mean - 1.5 * std - 0.1 * std).round() as i64;
        let depth = depth_with_mid(mid);
        assert!(strategy.on_snapshot(&ctx(&depth, 0), &mut memory).is_empty());
    }

    #[test]
    fn test_heavy_inventory_halves_size() {
        let strategy = BandReversion::new(BandReversionConfig::default());
        let mut memory = falling_memory();
        let depth = depth_with_mid(1_960);

        // Short 45: deep oversold pierce buys (50 + 45) / 2 after halving.
        let orders = strategy.on_snapshot(&ctx(&depth, -45), &mut memory);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, 47);
    }
}
