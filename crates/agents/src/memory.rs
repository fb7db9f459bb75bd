//! Strategy state carried between ticks through `trader_data`.
//!
//! The sandbox hands each tick's output string back unchanged on the next
//! tick, so all rolling state (price windows) is serialized to JSON and
//! decoded again on the way in. A missing or corrupt string decodes to a
//! fresh default so a trader never crashes on its first tick.

use quant::RollingWindow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::Symbol;

/// Number of mid prices each product remembers by default.
pub const DEFAULT_MID_WINDOW: usize = 30;

/// Rolling per-product state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMemory {
    /// Recent mid prices, oldest evicted first.
    pub mids: RollingWindow,
}

impl ProductMemory {
    /// Create memory with a mid-price window of the given capacity.
    pub fn with_window(capacity: usize) -> Self {
        Self {
            mids: RollingWindow::new(capacity),
        }
    }

    /// Record this tick's mid price, if the book had one.
    pub fn push_mid(&mut self, mid: Option<f64>) {
        if let Some(mid) = mid {
            self.mids.push(mid);
        }
    }
}

impl Default for ProductMemory {
    fn default() -> Self {
        Self::with_window(DEFAULT_MID_WINDOW)
    }
}

/// All product memories, keyed by symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraderMemory {
    pub products: HashMap<Symbol, ProductMemory>,
}

impl TraderMemory {
    /// Decode memory from a `trader_data` string.
    ///
    /// An empty or unparseable string yields a default memory rather than
    /// an error: the first tick of a replay always starts blank.
    pub fn decode(trader_data: &str) -> Self {
        if trader_data.is_empty() {
            return Self::default();
        }
        serde_json::from_str(trader_data).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unparseable trader_data");
            Self::default()
        })
    }

    /// Encode memory into the next tick's `trader_data` string.
    pub fn encode(&self) -> String {
        // HashMap-of-windows serialization is infallible.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Memory for one product, created on first access.
    pub fn product(&mut self, symbol: &str) -> &mut ProductMemory {
        self.products.entry(symbol.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_is_default() {
        let mem = TraderMemory::decode("");
        assert!(mem.products.is_empty());
    }

    #[test]
    fn test_decode_garbage_is_default() {
        let mem = TraderMemory::decode("{not json");
        assert!(mem.products.is_empty());
    }

    #[test]
    fn test_roundtrip_preserves_mids() {
        let mut mem = TraderMemory::default();
        mem.product("KELP").push_mid(Some(2000.5));
        mem.product("KELP").push_mid(Some(2001.0));

        let decoded = TraderMemory::decode(&mem.encode());
        let kelp = &decoded.products["KELP"];
        assert_eq!(kelp.mids.len(), 2);
        assert_eq!(kelp.mids.last(), Some(2001.0));
    }

    #[test]
    fn test_push_mid_ignores_missing() {
        let mut mem = ProductMemory::default();
        mem.push_mid(None);
        assert!(mem.mids.is_empty());
    }
}
