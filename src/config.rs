//! Run configuration: product set and strategy wiring.

use agents::{
    BandReversion, BandReversionConfig, FairValueQuoter, FairValueQuoterConfig, MomentumRider,
    MomentumRiderConfig, ProductStrategy, ScalpingMarketMaker, ScalpingMarketMakerConfig, Trader,
};
use clap::ValueEnum;

/// The three sandbox products traded by default.
pub const SANDBOX_PRODUCTS: [&str; 3] = ["KELP", "RAINFOREST_RESIN", "SQUID_INK"];

/// Which strategy family to run on every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Take/clear/make quoting around a fair value.
    FairValue,
    /// Volatility- and imbalance-adjusted scalping quotes.
    Scalper,
    /// Bollinger band mean reversion with RSI confirmation.
    Reversion,
    /// Regression-slope trend following.
    Momentum,
}

/// Anchor price a product trades around when history is empty.
fn default_fair(product: &str) -> f64 {
    match product {
        "RAINFOREST_RESIN" => 10_000.0,
        _ => 2_000.0,
    }
}

fn fair_value_config(product: &str) -> FairValueQuoterConfig {
    match product {
        "RAINFOREST_RESIN" => FairValueQuoterConfig::resin(),
        "SQUID_INK" => FairValueQuoterConfig::squid_ink(),
        "KELP" => FairValueQuoterConfig::kelp(),
        other => FairValueQuoterConfig {
            symbol: other.to_string(),
            ..FairValueQuoterConfig::default()
        },
    }
}

/// Build a trader running the chosen strategy on every requested product.
pub fn build_trader(kind: StrategyKind, products: &[String]) -> Trader {
    let strategies: Vec<Box<dyn ProductStrategy>> = products
        .iter()
        .map(|product| -> Box<dyn ProductStrategy> {
            match kind {
                StrategyKind::FairValue => {
                    Box::new(FairValueQuoter::new(fair_value_config(product)))
                }
                StrategyKind::Scalper => Box::new(ScalpingMarketMaker::new(
                    ScalpingMarketMakerConfig {
                        symbol: product.clone(),
                        default_fair_value: default_fair(product),
                        ..ScalpingMarketMakerConfig::default()
                    },
                )),
                StrategyKind::Reversion => Box::new(BandReversion::new(BandReversionConfig {
                    symbol: product.clone(),
                    default_fair_value: default_fair(product),
                    ..BandReversionConfig::default()
                })),
                StrategyKind::Momentum => Box::new(MomentumRider::new(MomentumRiderConfig {
                    symbol: product.clone(),
                    default_fair_value: default_fair(product),
                    ..MomentumRiderConfig::default()
                })),
            }
        })
        .collect();
    Trader::new(strategies)
}
