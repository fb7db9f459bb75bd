//! Core types for the Tidepool trading sandbox.
//!
//! This crate provides the shared data model used across the workspace:
//! orders, trades, price-level order depth snapshots, and the per-tick
//! `TradingState` that strategies consume.
//!
//! Prices in the sandbox are whole integer ticks ("seashells"), so `Price`
//! wraps an `i64` with no fixed-point scale. Volumes and order quantities are
//! signed: in an `OrderDepth`, resting sell interest carries a negative
//! volume; in an `Order`, a positive quantity is a buy and a negative
//! quantity is a sell.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// =============================================================================
// Symbol & Time Types
// =============================================================================

/// Product symbol (e.g., "KELP", "RAINFOREST_RESIN").
pub type Symbol = String;

/// Sandbox timestamp (tick time, monotonically increasing per snapshot).
pub type Timestamp = u64;

/// Signed volume: positive = resting buy interest, negative = resting sell.
pub type Volume = i64;

// =============================================================================
// Price Type
// =============================================================================

/// Integer price in whole ticks.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Round a fractional price (fair value, band level) to the nearest tick.
    #[inline]
    pub fn from_f64_round(v: f64) -> Self {
        Self(v.round() as i64)
    }

    /// Price as f64 for indicator arithmetic.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }

    /// Raw tick value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// Which side of the market an order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// An order emitted by a strategy for one product.
///
/// Quantity is signed: positive buys, negative sells. A zero-quantity order
/// is never emitted by the quoting engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Product being traded.
    pub symbol: Symbol,
    /// Limit price in ticks.
    pub price: Price,
    /// Signed quantity (positive = buy, negative = sell).
    pub quantity: i64,
}

impl Order {
    /// Create an order with an explicit signed quantity.
    pub fn new(symbol: impl Into<Symbol>, price: Price, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
        }
    }

    /// Create a buy order for `quantity` units (stored positive).
    pub fn buy(symbol: impl Into<Symbol>, price: Price, quantity: i64) -> Self {
        Self::new(symbol, price, quantity.abs())
    }

    /// Create a sell order for `quantity` units (stored negative).
    pub fn sell(symbol: impl Into<Symbol>, price: Price, quantity: i64) -> Self {
        Self::new(symbol, price, -quantity.abs())
    }

    /// Side implied by the quantity sign.
    pub fn side(&self) -> OrderSide {
        if self.quantity >= 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    /// Unsigned order size.
    pub fn abs_quantity(&self) -> i64 {
        self.quantity.abs()
    }

    /// Check if this is a buy order.
    pub fn is_buy(&self) -> bool {
        self.quantity > 0
    }

    /// Check if this is a sell order.
    pub fn is_sell(&self) -> bool {
        self.quantity < 0
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {}",
            self.side(),
            self.abs_quantity(),
            self.symbol,
            self.price
        )
    }
}

// =============================================================================
// Order Depth
// =============================================================================

/// Price-level snapshot of resting interest for one product.
///
/// `buy_orders` maps price → positive volume, `sell_orders` maps price →
/// negative volume (the sign convention of the sandbox wire format). BTreeMap
/// keeps levels ordered so best bid/ask are the last/first keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderDepth {
    /// Bid levels: price → resting buy volume (>= 0).
    pub buy_orders: BTreeMap<Price, Volume>,
    /// Ask levels: price → resting sell volume (<= 0).
    pub sell_orders: BTreeMap<Price, Volume>,
}

impl OrderDepth {
    /// Create an empty depth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bid level. Volume is stored positive.
    pub fn set_bid_level(&mut self, price: Price, volume: i64) {
        self.buy_orders.insert(price, volume.abs());
    }

    /// Insert an ask level. Volume is stored negative.
    pub fn set_ask_level(&mut self, price: Price, volume: i64) {
        self.sell_orders.insert(price, -volume.abs());
    }

    /// Highest resting bid price.
    pub fn best_bid(&self) -> Option<Price> {
        self.buy_orders.keys().next_back().copied()
    }

    /// Lowest resting ask price.
    pub fn best_ask(&self) -> Option<Price> {
        self.sell_orders.keys().next().copied()
    }

    /// Mid price between best bid and best ask.
    ///
    /// Returns `None` when either side of the book is empty; callers fall
    /// back to their configured default fair value.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.to_f64() + ask.to_f64()) / 2.0),
            _ => None,
        }
    }

    /// Spread between best ask and best bid, in ticks.
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.raw() - bid.raw()),
            _ => None,
        }
    }

    /// Total resting buy volume across all levels.
    pub fn total_bid_volume(&self) -> i64 {
        self.buy_orders.values().sum()
    }

    /// Total resting sell volume across all levels (as a positive number).
    pub fn total_ask_volume(&self) -> i64 {
        self.sell_orders.values().map(|v| v.abs()).sum()
    }

    /// Book imbalance: (bid volume − ask volume) / total volume.
    ///
    /// Positive values mean more resting buy interest. Returns 0.0 for an
    /// empty book.
    pub fn imbalance(&self) -> f64 {
        let bid = self.total_bid_volume() as f64;
        let ask = self.total_ask_volume() as f64;
        let total = bid + ask;
        if total > 0.0 {
            (bid - ask) / total
        } else {
            0.0
        }
    }

    /// Check if both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.buy_orders.is_empty() && self.sell_orders.is_empty()
    }
}

// =============================================================================
// Trade Type
// =============================================================================

/// An executed trade.
///
/// For own trades recorded by the backtester the quantity keeps the order's
/// sign; historical market trades carry positive quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Product traded.
    pub symbol: Symbol,
    /// Execution price.
    pub price: Price,
    /// Signed quantity.
    pub quantity: i64,
    /// Buyer identity ("" when unknown).
    pub buyer: String,
    /// Seller identity ("" when unknown).
    pub seller: String,
    /// When the trade occurred.
    pub timestamp: Timestamp,
}

impl Trade {
    /// Create a new trade record.
    pub fn new(
        symbol: impl Into<Symbol>,
        price: Price,
        quantity: i64,
        buyer: impl Into<String>,
        seller: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
            buyer: buyer.into(),
            seller: seller.into(),
            timestamp,
        }
    }

    /// Signed cash flow of this trade from the submitter's perspective:
    /// buys cost cash (negative), sells raise cash (positive).
    pub fn cash_flow(&self) -> i64 {
        -(self.price.raw() * self.quantity)
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Exchange listing metadata for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: Symbol,
    pub product: String,
    pub denomination: String,
}

impl Listing {
    pub fn new(
        symbol: impl Into<Symbol>,
        product: impl Into<String>,
        denomination: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            product: product.into(),
            denomination: denomination.into(),
        }
    }
}

// =============================================================================
// Trading State
// =============================================================================

/// One tick of sandbox input: everything a trader sees before quoting.
///
/// `trader_data` is an opaque string the trader carries forward between ticks
/// (the sandbox round-trips it verbatim); strategies serialize their rolling
/// state into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TradingState {
    /// Opaque state carried forward from the previous tick.
    #[serde(rename = "traderData")]
    pub trader_data: String,
    /// Snapshot timestamp.
    pub timestamp: Timestamp,
    /// Listings by symbol.
    pub listings: HashMap<Symbol, Listing>,
    /// Order depth per symbol.
    pub order_depths: HashMap<Symbol, OrderDepth>,
    /// Our own executed trades per symbol, cumulative across a replay.
    pub own_trades: HashMap<Symbol, Vec<Trade>>,
    /// Historical market trades per symbol for this tick.
    pub market_trades: HashMap<Symbol, Vec<Trade>>,
    /// Signed position per symbol.
    pub position: HashMap<Symbol, i64>,
    /// Plain-value observations (conversion signals etc.).
    pub observations: HashMap<String, f64>,
}

impl TradingState {
    /// Signed position for a symbol, 0 when absent.
    pub fn position_for(&self, symbol: &str) -> i64 {
        self.position.get(symbol).copied().unwrap_or(0)
    }

    /// Order depth for a symbol, if present.
    pub fn depth_for(&self, symbol: &str) -> Option<&OrderDepth> {
        self.order_depths.get(symbol)
    }
}

// =============================================================================
// Position Limit Helpers
// =============================================================================

/// Maximum quantity that can still be bought without breaching the limit.
#[inline]
pub fn max_buyable(limit: i64, position: i64) -> i64 {
    limit - position
}

/// Maximum quantity that can still be sold without breaching the limit.
#[inline]
pub fn max_sellable(limit: i64, position: i64) -> i64 {
    limit + position
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_sign_convention() {
        let buy = Order::buy("KELP", Price(2000), 10);
        assert_eq!(buy.quantity, 10);
        assert_eq!(buy.side(), OrderSide::Buy);

        let sell = Order::sell("KELP", Price(2001), 10);
        assert_eq!(sell.quantity, -10);
        assert_eq!(sell.side(), OrderSide::Sell);
        assert_eq!(sell.abs_quantity(), 10);
    }

    #[test]
    fn test_order_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn test_depth_best_and_mid() {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(1998), 20);
        depth.set_bid_level(Price(1999), 10);
        depth.set_ask_level(Price(2001), 15);
        depth.set_ask_level(Price(2002), 25);

        assert_eq!(depth.best_bid(), Some(Price(1999)));
        assert_eq!(depth.best_ask(), Some(Price(2001)));
        assert_eq!(depth.mid_price(), Some(2000.0));
        assert_eq!(depth.spread(), Some(2));
    }

    #[test]
    fn test_depth_mid_missing_side() {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(1999), 10);
        assert_eq!(depth.mid_price(), None);
        assert_eq!(depth.spread(), None);
    }

    #[test]
    fn test_depth_sign_convention() {
        let mut depth = OrderDepth::new();
        depth.set_ask_level(Price(2001), 15);
        assert_eq!(depth.sell_orders[&Price(2001)], -15);
        assert_eq!(depth.total_ask_volume(), 15);
    }

    #[test]
    fn test_depth_imbalance() {
        let mut depth = OrderDepth::new();
        depth.set_bid_level(Price(1999), 30);
        depth.set_ask_level(Price(2001), 10);
        assert!((depth.imbalance() - 0.5).abs() < 1e-12);

        assert_eq!(OrderDepth::new().imbalance(), 0.0);
    }

    #[test]
    fn test_trade_cash_flow() {
        let buy = Trade::new("KELP", Price(2000), 5, "SUBMISSION", "", 100);
        assert_eq!(buy.cash_flow(), -10_000);

        let sell = Trade::new("KELP", Price(2010), -5, "", "SUBMISSION", 200);
        assert_eq!(sell.cash_flow(), 10_050);
    }

    #[test]
    fn test_state_position_for() {
        let mut state = TradingState::default();
        state.position.insert("KELP".to_string(), -7);
        assert_eq!(state.position_for("KELP"), -7);
        assert_eq!(state.position_for("SQUID_INK"), 0);
    }

    #[test]
    fn test_position_limit_helpers() {
        assert_eq!(max_buyable(50, 10), 40);
        assert_eq!(max_sellable(50, 10), 60);
        assert_eq!(max_buyable(50, -20), 70);
        assert_eq!(max_sellable(50, -20), 30);
    }
}
