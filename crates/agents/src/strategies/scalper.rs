//! Scalping market maker with volatility- and imbalance-aware quotes.
//!
//! Quotes both sides of a rolling-average fair value. The half-spread widens
//! with recent mid volatility and leans with book imbalance; an inventory
//! skew pulls the ask in when long (or the bid up when short) so fills work
//! the position back toward flat. Sizes are the full remaining limit room,
//! halved once inventory gets heavy.

use types::{max_buyable, max_sellable, Order, Price};

use crate::memory::ProductMemory;
use crate::traits::{ProductStrategy, SnapshotContext};

/// Configuration for a [`ScalpingMarketMaker`].
#[derive(Debug, Clone)]
pub struct ScalpingMarketMakerConfig {
    /// Product to quote.
    pub symbol: String,
    /// Hard position limit.
    pub position_limit: i64,
    /// Fair value used while the mid history is empty.
    pub default_fair_value: f64,
    /// Minimum half-spread in ticks.
    pub base_offset: f64,
    /// Extra half-spread per tick of rolling mid std deviation.
    pub volatility_coeff: f64,
    /// Imbalance contribution to the half-spread, scaled by volatility.
    pub imbalance_coeff: f64,
    /// Quote pull-in at full inventory, in ticks.
    pub inventory_skew: f64,
    /// Fraction of the limit beyond which quote sizes are halved.
    pub soft_ratio: f64,
}

impl Default for ScalpingMarketMakerConfig {
    fn default() -> Self {
        Self {
            symbol: "RAINFOREST_RESIN".to_string(),
            position_limit: 50,
            default_fair_value: 10_000.0,
            base_offset: 1.0,
            volatility_coeff: 0.1,
            imbalance_coeff: 0.5,
            inventory_skew: 10.0,
            soft_ratio: 0.8,
        }
    }
}

/// Quotes around a rolling fair value with a dynamic offset and inventory
/// skew.
pub struct ScalpingMarketMaker {
    config: ScalpingMarketMakerConfig,
}

impl ScalpingMarketMaker {
    pub fn new(config: ScalpingMarketMakerConfig) -> Self {
        Self { config }
    }

    /// Half-spread for this tick: base edge plus volatility and imbalance
    /// adjustments.
    fn dynamic_offset(&self, std_dev: f64, imbalance: f64) -> f64 {
        self.config.base_offset
            + self.config.volatility_coeff * std_dev
            + self.config.imbalance_coeff * imbalance * std_dev
    }
}

impl ProductStrategy for ScalpingMarketMaker {
    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    fn position_limit(&self) -> i64 {
        self.config.position_limit
    }

    fn on_snapshot(&self, ctx: &SnapshotContext<'_>, memory: &mut ProductMemory) -> Vec<Order> {
        let limit = ctx.position_limit;
        let std_dev = memory.mids.std_dev().unwrap_or(0.0);
        let offset = self.dynamic_offset(std_dev, ctx.depth.imbalance());
        let fair = memory.mids.mean().unwrap_or(self.config.default_fair_value);

        // Skew only pulls the quote that reduces inventory.
        let skew = self.config.inventory_skew * ctx.position.abs() as f64 / limit as f64;
        let mut bid_price = fair - offset;
        let mut ask_price = fair + offset;
        if ctx.position < 0 {
            bid_price += skew;
        } else if ctx.position > 0 {
            ask_price -= skew;
        }
        let bid = Price::from_f64_round(bid_price);
        let ask = Price::from_f64_round(ask_price);

        let mut buy_quantity = max_buyable(limit, ctx.position);
        let mut sell_quantity = max_sellable(limit, ctx.position);

        // Back off when inventory is already heavy.
        let soft_limit = (self.config.soft_ratio * limit as f64) as i64;
        if ctx.position.abs() > soft_limit {
            buy_quantity /= 2;
            sell_quantity /= 2;
        }

        tracing::debug!(
            symbol = %self.config.symbol,
            timestamp = ctx.timestamp,
            fair,
            offset,
            skew,
            position = ctx.position,
            "scalper quotes"
        );

        let mut orders = Vec::with_capacity(2);
        if buy_quantity > 0 {
            orders.push(Order::buy(self.config.symbol.clone(), bid, buy_quantity));
        }
        if sell_quantity > 0 {
            orders.push(Order::sell(self.config.symbol.clone(), ask, sell_quantity));
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::OrderDepth;

    fn balanced_depth() -> OrderDepth {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(9_999), 20);
        depth.set_ask_level(Price(10_001), 20);
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

    fn warm_memory(level: f64, n: usize) -> ProductMemory {
        let mut memory = ProductMemory::default();
        for _ in 0..n {
            memory.push_mid(Some(level));
        }
        memory
    }

    #[test]
    fn test_quotes_base_offset_around_rolling_fair() {
        let strategy = ScalpingMarketMaker::new(ScalpingMarketMakerConfig::default());
        let depth = balanced_depth();
        let mut memory = warm_memory(10_000.0, 10);

        let orders = strategy.on_snapshot(&ctx(&depth, 0), &mut memory);

        // Flat history: zero std, zero skew, quotes one base offset off fair.
        let bid = orders.iter().find(|o| o.is_buy()).unwrap();
        let ask = orders.iter().find(|o| o.is_sell()).unwrap();
        assert_eq!(bid.price, Price(9_999));
        assert_eq!(ask.price, Price(10_001));
        assert_eq!(bid.quantity, 50);
        assert_eq!(ask.quantity, -50);
    }

    #[test]
    fn test_empty_history_falls_back_to_default_fair() {
        let strategy = ScalpingMarketMaker::new(ScalpingMarketMakerConfig::default());
        let depth = balanced_depth();
        let mut memory = ProductMemory::default();

        let orders = strategy.on_snapshot(&ctx(&depth, 0), &mut memory);
        let bid = orders.iter().find(|o| o.is_buy()).unwrap();
        assert_eq!(bid.price, Price(9_999));
    }

    #[test]
    fn test_volatility_widens_quotes() {
        let strategy = ScalpingMarketMaker::new(ScalpingMarketMakerConfig::default());
        let depth = balanced_depth();
        let mut memory = ProductMemory::default();
        for mid in [9_960.0, 10_040.0, 9_950.0, 10_050.0, 9_960.0, 10_040.0] {
            memory.push_mid(Some(mid));
        }

        let orders = strategy.on_snapshot(&ctx(&depth, 0), &mut memory);
        let bid = orders.iter().find(|o| o.is_buy()).unwrap();
        let ask = orders.iter().find(|o| o.is_sell()).unwrap();
        assert!(bid.price < Price(9_999), "bid {} not widened", bid.price);
        assert!(ask.price > Price(10_001), "ask {} not widened", ask.price);
    }

    #[test]
    fn test_long_inventory_pulls_ask_in() {
        let strategy = ScalpingMarketMaker::new(ScalpingMarketMakerConfig::default());
        let depth = balanced_depth();
        let mut memory = warm_memory(10_000.0, 10);

        let orders = strategy.on_snapshot(&ctx(&depth, 25), &mut memory);
        let bid = orders.iter().find(|o| o.is_buy()).unwrap();
        let ask = orders.iter().find(|o| o.is_sell()).unwrap();
        // Skew = 10 * 25/50 = 5 pulls the ask through the fair; bid untouched.
        assert_eq!(ask.price, Price(9_996));
        assert_eq!(bid.price, Price(9_999));
    }

    #[test]
    fn test_short_inventory_pulls_bid_up() {
        let strategy = ScalpingMarketMaker::new(ScalpingMarketMakerConfig::default());
        let depth = balanced_depth();
        let mut memory = warm_memory(10_000.0, 10);

        let orders = strategy.on_snapshot(&ctx(&depth, -25), &mut memory);
        let bid = orders.iter().find(|o| o.is_buy()).unwrap();
        let ask = orders.iter().find(|o| o.is_sell()).unwrap();
        assert_eq!(bid.price, Price(10_004));
        assert_eq!(ask.price, Price(10_001));
    }

    #[test]
    fn test_heavy_inventory_halves_sizes() {
        let strategy = ScalpingMarketMaker::new(ScalpingMarketMakerConfig::default());
        let depth = balanced_depth();
        let mut memory = warm_memory(10_000.0, 10);

        // |position| = 45 > 0.8 * 50.
        let orders = strategy.on_snapshot(&ctx(&depth, -45), &mut memory);
        let bid = orders.iter().find(|o| o.is_buy()).unwrap();
        let sell = orders.iter().find(|o| o.is_sell()).unwrap();
        assert_eq!(bid.quantity, 47); // (50 + 45) / 2
        assert_eq!(sell.quantity, -2); // (50 - 45) / 2
    }
}
