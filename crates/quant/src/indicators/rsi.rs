//! Relative Strength Index (RSI) indicator.

/// Relative Strength Index over the last `period` price changes.
///
/// Uses plain averaging of gains and losses over the period (no Wilder
/// smoothing): both sums are divided by the period, so a window with few
/// moves reads closer to neutral.
///
/// RSI > 70 is typically considered overbought, < 30 oversold.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Neutral reading reported while history is still warming up.
    pub const NEUTRAL: f64 = 50.0;

    /// Create a new RSI with the given period.
    ///
    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self { period }
    }

    /// RSI over the last `period` changes in the slice.
    ///
    /// Returns [`Rsi::NEUTRAL`] with fewer than `period + 1` prices so that
    /// oversold/overbought threshold filters stay inert, and 100.0 when the
    /// window contains no losses.
    pub fn calculate(&self, prices: &[f64]) -> f64 {
        Rsi::calculate_from_prices(prices, self.period)
    }

    /// See [`Rsi::calculate`].
    pub fn calculate_from_prices(prices: &[f64], period: usize) -> f64 {
        if prices.len() < period + 1 {
            return Rsi::NEUTRAL;
        }

        let recent = &prices[prices.len() - period - 1..];
        let (gain_sum, loss_sum) = recent
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold((0.0_f64, 0.0_f64), |(g, l), change| {
                if change > 0.0 {
                    (g + change, l)
                } else {
                    (g, l - change)
                }
            });

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_neutral_on_short_history() {
        let prices = [100.0, 101.0, 102.0];
        assert_eq!(Rsi::new(14).calculate(&prices), Rsi::NEUTRAL);
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(Rsi::new(14).calculate(&prices), 100.0);
    }

    #[test]
    fn test_rsi_all_losses_near_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let rsi = Rsi::new(14).calculate(&prices);
        assert!(rsi < 1.0, "expected near-zero RSI, got {rsi}");
    }

    #[test]
    fn test_rsi_balanced_is_50() {
        // Alternating +1/-1 changes: equal average gain and loss.
        let mut prices = vec![100.0];
        for i in 0..14 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let rsi = Rsi::new(14).calculate(&prices);
        assert!((rsi - 50.0).abs() < 4.0, "expected roughly neutral, got {rsi}");
    }
}
