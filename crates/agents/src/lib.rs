//! Trading strategies and the per-tick trader loop.
//!
//! The central abstraction is [`ProductStrategy`]: a per-product decision
//! function that receives a read-only [`SnapshotContext`] and its own
//! [`ProductMemory`], and returns the orders to submit for that tick.
//! A [`Trader`] owns one strategy per product and handles memory
//! round-tripping through the opaque `trader_data` string.
//!
//! The quoting pipeline shared by market-making strategies lives in
//! [`quoting`]: take mispriced resting orders, clear excess inventory,
//! then make two-sided quotes.

pub mod memory;
pub mod quoting;
pub mod strategies;
pub mod traits;

pub use memory::{ProductMemory, TraderMemory};
pub use quoting::{QuoteParams, Quoter};
pub use strategies::{
    BandReversion, BandReversionConfig, FairValueQuoter, FairValueQuoterConfig, FairValueSource,
    MomentumRider, MomentumRiderConfig, ScalpingMarketMaker, ScalpingMarketMakerConfig,
};
pub use traits::{ProductStrategy, SnapshotContext, Trader, TraderOutput};
