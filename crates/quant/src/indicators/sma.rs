//! Simple Moving Average (SMA) indicator.

/// Simple Moving Average over the last `period` prices.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the given period.
    ///
    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self { period }
    }

    /// Average of the last `period` prices, `None` with fewer samples.
    pub fn calculate(&self, prices: &[f64]) -> Option<f64> {
        Sma::calculate_from_prices(prices, self.period)
    }

    /// Average of the last `period` prices in the slice.
    pub fn calculate_from_prices(prices: &[f64], period: usize) -> Option<f64> {
        if prices.len() < period || period == 0 {
            return None;
        }
        let sum: f64 = prices[prices.len() - period..].iter().sum();
        Some(sum / period as f64)
    }
}
