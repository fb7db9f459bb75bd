//! Quantitative utilities for Tidepool strategies.
//!
//! # Modules
//!
//! - [`rolling`] - Fixed-capacity rolling window over mid prices
//! - [`indicators`] - Technical indicators (SMA, RSI, Bollinger Bands, momentum)
//!
//! # Design Notes
//!
//! - All calculations use `f64`; integer tick prices are widened by callers
//! - Indicators operate on price slices ordered oldest → newest
//! - `RollingWindow` is serde-serializable so strategies can round-trip their
//!   price history through the sandbox's opaque `trader_data` string

pub mod indicators;
pub mod rolling;

pub use indicators::{BollingerBands, BollingerOutput, Momentum, Rsi, Sma};
pub use rolling::RollingWindow;
