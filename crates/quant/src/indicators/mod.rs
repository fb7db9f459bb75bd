//! Technical indicators for strategy signal generation.
//!
//! All indicators operate on price slices ordered oldest → newest and return
//! `f64` values. Indicators that need a minimum sample count return `Option`
//! and leave the "no signal" interpretation to the caller; the one exception
//! is [`Rsi`], which reports a neutral 50.0 on insufficient data so threshold
//! filters stay inert while history warms up.
//!
//! # Supported Indicators
//! - **SMA** - Simple Moving Average
//! - **RSI** - Relative Strength Index (simple averaging over the period)
//! - **Bollinger Bands** - Volatility bands around the rolling mean
//! - **Momentum** - Least-squares regression slope over a short window

mod bollinger;
mod momentum;
mod rsi;
mod sma;

pub use bollinger::{BollingerBands, BollingerOutput};
pub use momentum::Momentum;
pub use rsi::Rsi;
pub use sma::Sma;
