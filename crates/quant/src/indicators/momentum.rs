//! Momentum indicator: regression slope over a short window.

/// Momentum measured as the least-squares slope of the last `window` prices
/// against their index (0, 1, ..., n−1).
///
/// A positive slope means the price is trending up, in ticks per snapshot.
#[derive(Debug, Clone)]
pub struct Momentum {
    window: usize,
}

impl Momentum {
    /// Create a momentum indicator over the given window.
    ///
    /// # Panics
    /// Panics if window is < 2.
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "Momentum window must be >= 2");
        Self { window }
    }

    /// Regression slope over the last `window` prices.
    ///
    /// Returns `None` with fewer than `window` samples; callers treat that
    /// as "no signal".
    pub fn slope(&self, prices: &[f64]) -> Option<f64> {
        Momentum::slope_from_prices(prices, self.window)
    }

    /// See [`Momentum::slope`].
    pub fn slope_from_prices(prices: &[f64], window: usize) -> Option<f64> {
        if prices.len() < window || window < 2 {
            return None;
        }

        let recent = &prices[prices.len() - window..];
        let n = window as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = recent.iter().sum::<f64>() / n;

        let (num, den) = recent.iter().enumerate().fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

        if den == 0.0 {
            return Some(0.0);
        }
        Some(num / den)
    }

    /// Difference between the last price and the one before it.
    pub fn last_change(prices: &[f64]) -> Option<f64> {
        let n = prices.len();
        if n < 2 {
            return None;
        }
        Some(prices[n - 1] - prices[n - 2])
    }
}
