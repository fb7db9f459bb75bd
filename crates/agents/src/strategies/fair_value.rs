//! Fair-value quoter: the take/clear/make pipeline around a fair estimate.
//!
//! This is the workhorse strategy for the stable sandbox products. The fair
//! value is either pinned (RAINFOREST_RESIN trades around a known anchor) or
//! estimated as a rolling mean of recent mid prices.

use types::Order;

use crate::memory::ProductMemory;
use crate::quoting::{QuoteParams, Quoter};
use crate::traits::{ProductStrategy, SnapshotContext};

/// Where the quoter gets its fair value each tick.
#[derive(Debug, Clone, Copy)]
pub enum FairValueSource {
    /// A fixed anchor price.
    Fixed(f64),
    /// Mean of the last `window` observed mid prices, falling back to the
    /// current mid while the window warms up.
    RollingMean { window: usize },
}

/// Configuration for a [`FairValueQuoter`].
#[derive(Debug, Clone)]
pub struct FairValueQuoterConfig {
    /// Product to quote.
    pub symbol: String,
    /// Hard position limit.
    pub position_limit: i64,
    /// Fair value source.
    pub fair_source: FairValueSource,
    /// Edge required before taking.
    pub take_width: f64,
    /// Worst acceptable clearing distance from fair.
    pub clear_width: f64,
    /// Resting levels inside this edge are ignored when quoting.
    pub disregard_edge: f64,
    /// Join resting levels at or inside this edge.
    pub join_edge: f64,
    /// Quote edge used when no resting level guides us.
    pub default_edge: f64,
    /// Skip takes against levels larger than `adverse_volume`.
    pub prevent_adverse: bool,
    /// Level-size threshold for `prevent_adverse`.
    pub adverse_volume: i64,
    /// Shade quotes toward flat past this absolute position.
    pub soft_position_limit: Option<i64>,
}

impl Default for FairValueQuoterConfig {
    fn default() -> Self {
        Self {
            symbol: "KELP".to_string(),
            position_limit: 50,
            fair_source: FairValueSource::RollingMean { window: 10 },
            take_width: 1.0,
            clear_width: 0.0,
            disregard_edge: 1.0,
            join_edge: 0.0,
            default_edge: 1.0,
            prevent_adverse: true,
            adverse_volume: 15,
            soft_position_limit: None,
        }
    }
}

impl FairValueQuoterConfig {
    /// Tuning for RAINFOREST_RESIN: pinned fair, wide default edge,
    /// position shading past 10 units.
    pub fn resin() -> Self {
        Self {
            symbol: "RAINFOREST_RESIN".to_string(),
            fair_source: FairValueSource::Fixed(10_000.0),
            take_width: 1.0,
            clear_width: 0.0,
            disregard_edge: 1.0,
            join_edge: 2.0,
            default_edge: 4.0,
            prevent_adverse: false,
            adverse_volume: 0,
            soft_position_limit: Some(10),
            ..Self::default()
        }
    }

    /// Tuning for KELP: rolling fair, tight edges, adverse-size filter.
    pub fn kelp() -> Self {
        Self::default()
    }

    /// Tuning for SQUID_INK: like KELP but with a wider disregard edge
    /// (its book is noisier near fair).
    pub fn squid_ink() -> Self {
        Self {
            symbol: "SQUID_INK".to_string(),
            disregard_edge: 2.0,
            ..Self::default()
        }
    }
}

/// Quotes a single product around a fair value estimate.
pub struct FairValueQuoter {
    config: FairValueQuoterConfig,
    quoter: Quoter,
}

impl FairValueQuoter {
    pub fn new(config: FairValueQuoterConfig) -> Self {
        let quoter = Quoter::new(config.symbol.clone(), config.position_limit);
        Self { config, quoter }
    }

    /// Resolve this tick's fair value, `None` when there is nothing to
    /// anchor on (empty book and empty history).
    fn fair_value(&self, ctx: &SnapshotContext<'_>, memory: &ProductMemory) -> Option<f64> {
        match self.config.fair_source {
            FairValueSource::Fixed(v) => Some(v),
            FairValueSource::RollingMean { window } => {
                let tail = memory.mids.tail(window);
                if tail.is_empty() {
                    ctx.depth.mid_price()
                } else {
                    Some(tail.iter().sum::<f64>() / tail.len() as f64)
                }
            }
        }
    }
}

impl ProductStrategy for FairValueQuoter {
    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    fn position_limit(&self) -> i64 {
        self.config.position_limit
    }

    fn on_snapshot(&self, ctx: &SnapshotContext<'_>, memory: &mut ProductMemory) -> Vec<Order> {
        let Some(fair) = self.fair_value(ctx, memory) else {
            tracing::debug!(symbol = %self.config.symbol, "no fair value anchor, skipping tick");
            return vec![];
        };

        let params = QuoteParams {
            fair_value: fair,
            take_width: self.config.take_width,
            clear_width: self.config.clear_width,
            disregard_edge: self.config.disregard_edge,
            join_edge: self.config.join_edge,
            default_edge: self.config.default_edge,
            prevent_adverse: self.config.prevent_adverse,
            adverse_volume: self.config.adverse_volume,
            soft_position_limit: self.config.soft_position_limit,
        };

        let orders = self.quoter.run(ctx.depth, ctx.position, &params);
        tracing::debug!(
            symbol = %self.config.symbol,
            timestamp = ctx.timestamp,
            fair,
            position = ctx.position,
            order_count = orders.len(),
            "fair value pass"
        );
        orders
    }
}
