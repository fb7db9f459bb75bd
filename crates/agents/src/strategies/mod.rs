//! Concrete per-product strategies.
//!
//! # Available Strategies
//! - [`FairValueQuoter`] - Take/clear/make quoting around a fair value
//! - [`ScalpingMarketMaker`] - Volatility- and imbalance-adjusted quotes
//! - [`BandReversion`] - Mean reversion at Bollinger band extremes
//! - [`MomentumRider`] - Trend following on the regression slope

mod fair_value;
mod momentum_rider;
mod reversion;
mod scalper;

pub use fair_value::{FairValueQuoter, FairValueQuoterConfig, FairValueSource};
pub use momentum_rider::{MomentumRider, MomentumRiderConfig};
pub use reversion::{BandReversion, BandReversionConfig};
pub use scalper::{ScalpingMarketMaker, ScalpingMarketMakerConfig};
