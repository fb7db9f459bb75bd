//! Bollinger Bands indicator.

/// Bollinger Bands output values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BollingerOutput {
    /// Upper band (mean + multiplier × std).
    pub upper: f64,
    /// Middle band (rolling mean).
    pub middle: f64,
    /// Lower band (mean − multiplier × std).
    pub lower: f64,
    /// Sample standard deviation used to build the bands.
    pub std_dev: f64,
}

/// Bollinger Bands around the mean of a price window.
///
/// Bands sit at `mean ± multiplier × std` where std is the sample standard
/// deviation of the whole slice passed in (callers control the window).
#[derive(Debug, Clone)]
pub struct BollingerBands {
    multiplier: f64,
}

impl BollingerBands {
    /// Create bands with the given standard deviation multiplier.
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Compute bands over the full slice.
    ///
    /// Returns `None` with fewer than 2 prices (no standard deviation).
    pub fn calculate(&self, prices: &[f64]) -> Option<BollingerOutput> {
        let n = prices.len();
        if n < 2 {
            return None;
        }

        let mean = prices.iter().sum::<f64>() / n as f64;
        let sum_sq: f64 = prices.iter().map(|p| (p - mean).powi(2)).sum();
        let std_dev = (sum_sq / (n - 1) as f64).sqrt();

        Some(BollingerOutput {
            upper: mean + self.multiplier * std_dev,
            middle: mean,
            lower: mean - self.multiplier * std_dev,
            std_dev,
        })
    }
}
