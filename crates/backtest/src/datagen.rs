//! Synthetic snapshot generation for tests and demos.
//!
//! Produces a `TradingState` series without any CSV input: the mid follows
//! a Gaussian random walk and each side of the book gets a few levels with
//! random sizes. Seeded, so demo replays are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use types::{Listing, OrderDepth, Price, TradingState};

use crate::state_builder::DENOMINATION;

/// Configuration for a [`SnapshotGenerator`].
#[derive(Debug, Clone)]
pub struct SnapshotGeneratorConfig {
    /// Product to generate.
    pub symbol: String,
    /// Starting mid price.
    pub initial_mid: f64,
    /// Std deviation of the per-tick mid move.
    pub volatility: f64,
    /// Half-spread between the mid and the best quotes, in ticks.
    pub half_spread: i64,
    /// Levels per book side (inclusive range, sampled each tick).
    pub min_levels: usize,
    pub max_levels: usize,
    /// Level volume range (inclusive).
    pub min_volume: i64,
    pub max_volume: i64,
    /// Timestamp step between snapshots.
    pub tick_interval: u64,
}

impl Default for SnapshotGeneratorConfig {
    fn default() -> Self {
        Self {
            symbol: "KELP".to_string(),
            initial_mid: 2_000.0,
            volatility: 1.5,
            half_spread: 2,
            min_levels: 2,
            max_levels: 3,
            min_volume: 5,
            max_volume: 30,
            tick_interval: 100,
        }
    }
}

/// Random-walk order book snapshot generator.
pub struct SnapshotGenerator {
    config: SnapshotGeneratorConfig,
    rng: StdRng,
    walk: Normal<f64>,
    mid: f64,
    timestamp: u64,
}

impl SnapshotGenerator {
    /// Create a generator with a fixed seed.
    pub fn with_seed(config: SnapshotGeneratorConfig, seed: u64) -> Self {
        let walk = Normal::new(0.0, config.volatility.max(f64::EPSILON))
            .expect("std dev is positive and finite");
        let mid = config.initial_mid;
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            walk,
            mid,
            timestamp: 0,
        }
    }

    /// Next snapshot in the series.
    pub fn next_state(&mut self) -> TradingState {
        self.mid += self.walk.sample(&mut self.rng);
        let mid_tick = self.mid.round() as i64;

        let mut depth = OrderDepth::new();
        let bid_levels = self
            .rng
            .random_range(self.config.min_levels..=self.config.max_levels);
        for i in 0..bid_levels {
            let price = Price(mid_tick - self.config.half_spread - i as i64);
            let volume = self
                .rng
                .random_range(self.config.min_volume..=self.config.max_volume);
            depth.set_bid_level(price, volume);
        }
        let ask_levels = self
            .rng
            .random_range(self.config.min_levels..=self.config.max_levels);
        for i in 0..ask_levels {
            let price = Price(mid_tick + self.config.half_spread + i as i64);
            let volume = self
                .rng
                .random_range(self.config.min_volume..=self.config.max_volume);
            depth.set_ask_level(price, volume);
        }

        let mut state = TradingState {
            timestamp: self.timestamp,
            ..TradingState::default()
        };
        state.listings.insert(
            self.config.symbol.clone(),
            Listing::new(
                self.config.symbol.clone(),
                self.config.symbol.clone(),
                DENOMINATION,
            ),
        );
        state.order_depths.insert(self.config.symbol.clone(), depth);
        state.position.insert(self.config.symbol.clone(), 0);
        state.own_trades.insert(self.config.symbol.clone(), Vec::new());
        state
            .market_trades
            .insert(self.config.symbol.clone(), Vec::new());

        self.timestamp += self.config.tick_interval;
        state
    }

    /// Generate a whole series at once.
    pub fn series(&mut self, count: usize) -> Vec<TradingState> {
        (0..count).map(|_| self.next_state()).collect()
    }
}
