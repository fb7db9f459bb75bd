//! CSV loading for historical market and trade data.
//!
//! The sandbox exports semicolon-delimited CSVs: a prices file with up to
//! three bid/ask levels per product per timestamp, and a trades file with
//! one executed trade per row. Missing levels are empty fields; trade
//! quantities occasionally carry thousands separators.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use types::Symbol;

use crate::error::Result;

/// One row of the prices CSV: a single product's book snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketRow {
    #[serde(default)]
    pub day: i64,
    pub timestamp: u64,
    pub product: String,
    pub bid_price_1: Option<f64>,
    pub bid_volume_1: Option<f64>,
    pub bid_price_2: Option<f64>,
    pub bid_volume_2: Option<f64>,
    pub bid_price_3: Option<f64>,
    pub bid_volume_3: Option<f64>,
    pub ask_price_1: Option<f64>,
    pub ask_volume_1: Option<f64>,
    pub ask_price_2: Option<f64>,
    pub ask_volume_2: Option<f64>,
    pub ask_price_3: Option<f64>,
    pub ask_volume_3: Option<f64>,
    pub mid_price: Option<f64>,
    pub profit_and_loss: Option<f64>,
}

impl MarketRow {
    /// Bid levels as (price, volume) pairs, best first, missing levels
    /// skipped.
    pub fn bid_levels(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        [
            (self.bid_price_1, self.bid_volume_1),
            (self.bid_price_2, self.bid_volume_2),
            (self.bid_price_3, self.bid_volume_3),
        ]
        .into_iter()
        .filter_map(|(p, v)| Some((p?, v?)))
    }

    /// Ask levels as (price, volume) pairs, best first, missing levels
    /// skipped.
    pub fn ask_levels(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        [
            (self.ask_price_1, self.ask_volume_1),
            (self.ask_price_2, self.ask_volume_2),
            (self.ask_price_3, self.ask_volume_3),
        ]
        .into_iter()
        .filter_map(|(p, v)| Some((p?, v?)))
    }
}

/// One row of the trades CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRow {
    pub timestamp: u64,
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub seller: String,
    pub symbol: String,
    #[serde(default)]
    pub currency: String,
    pub price: f64,
    #[serde(deserialize_with = "de_grouped_int")]
    pub quantity: i64,
}

/// Parse an integer that may carry `,` thousands separators.
fn de_grouped_int<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.replace(',', "")
        .trim()
        .parse()
        .map_err(serde::de::Error::custom)
}

fn wanted(products: &[Symbol], name: &str) -> bool {
    products.is_empty() || products.iter().any(|p| p == name)
}

/// Read market rows from any reader, keeping only the given products
/// (empty filter keeps everything).
pub fn read_market_rows<R: Read>(reader: R, products: &[Symbol]) -> Result<Vec<MarketRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: MarketRow = record?;
        if wanted(products, &row.product) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Read trade rows from any reader, keeping only the given products.
pub fn read_trade_rows<R: Read>(reader: R, products: &[Symbol]) -> Result<Vec<TradeRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: TradeRow = record?;
        if wanted(products, &row.symbol) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Load the prices CSV from disk.
pub fn load_market_csv(path: &Path, products: &[Symbol]) -> Result<Vec<MarketRow>> {
    let rows = read_market_rows(File::open(path)?, products)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded market data");
    Ok(rows)
}

/// Load the trades CSV from disk.
pub fn load_trades_csv(path: &Path, products: &[Symbol]) -> Result<Vec<TradeRow>> {
    let rows = read_trade_rows(File::open(path)?, products)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded trade data");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKET_CSV: &str = "\
day;timestamp;product;bid_price_1;bid_volume_1;bid_price_2;bid_volume_2;bid_price_3;bid_volume_3;ask_price_1;ask_volume_1;ask_price_2;ask_volume_2;ask_price_3;ask_volume_3;mid_price;profit_and_loss
0;0;KELP;2028;31;;;;;2032;31;;;;;2030.0;0.0
0;0;RAINFOREST_RESIN;9996;2;9995;29;;;10004;2;10005;29;;;10000.0;0.0
0;100;KELP;2026;24;2025;20;;;2029;4;2030;20;;;2027.5;0.0
";

    const TRADES_CSV: &str = "\
timestamp;buyer;seller;symbol;currency;price;quantity
0;;;KELP;SEASHELLS;2030;\"1,200\"
100;;;SQUID_INK;SEASHELLS;1999;5
";

    #[test]
    fn test_market_rows_parse_and_filter() {
        let rows = read_market_rows(MARKET_CSV.as_bytes(), &["KELP".to_string()]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, 0);
        assert_eq!(rows[0].bid_price_1, Some(2_028.0));
        assert_eq!(rows[0].bid_price_2, None);
        assert_eq!(rows[1].timestamp, 100);
    }

    #[test]
    fn test_empty_filter_keeps_all_products() {
        let rows = read_market_rows(MARKET_CSV.as_bytes(), &[]).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_level_iterators_skip_missing() {
        let rows = read_market_rows(MARKET_CSV.as_bytes(), &["KELP".to_string()]).unwrap();
        let levels: Vec<_> = rows[0].bid_levels().collect();
        assert_eq!(levels, vec![(2_028.0, 31.0)]);
        let levels: Vec<_> = rows[1].bid_levels().collect();
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn test_trade_rows_parse_grouped_quantity() {
        let rows = read_trade_rows(TRADES_CSV.as_bytes(), &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quantity, 1_200);
        assert_eq!(rows[1].symbol, "SQUID_INK");
    }

    #[test]
    fn test_trade_filter() {
        let rows = read_trade_rows(TRADES_CSV.as_bytes(), &["SQUID_INK".to_string()]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 5);
    }

    #[test]
    fn test_malformed_market_csv_is_error() {
        let bad = "day;timestamp;product\n0;not_a_number;KELP\n";
        assert!(read_market_rows(bad.as_bytes(), &[]).is_err());
    }
}
