//! Rolling window over recent mid prices.
//!
//! Strategies keep a short history of observed mid prices and derive their
//! fair value and volatility from it. The window is capped: pushing into a
//! full window discards the oldest value.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A fixed-capacity rolling window of `f64` samples.
///
/// Maintains a running sum for O(1) mean computation. The standard deviation
/// uses the sample (n − 1) estimator.
///
/// # Example
/// ```
/// use quant::RollingWindow;
///
/// let mut window = RollingWindow::new(3);
/// window.push(1.0);
/// window.push(2.0);
/// window.push(3.0);
/// assert_eq!(window.mean(), Some(2.0));
///
/// window.push(4.0); // drops 1.0
/// assert_eq!(window.mean(), Some(3.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindow {
    data: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl RollingWindow {
    /// Create a new rolling window with the given capacity.
    ///
    /// # Panics
    /// Panics if capacity is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RollingWindow capacity must be > 0");
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
        }
    }

    /// Push a sample, discarding the oldest when full.
    pub fn push(&mut self, value: f64) {
        if self.data.len() >= self.capacity {
            if let Some(old) = self.data.pop_front() {
                self.sum -= old;
            }
        }
        self.data.push_back(value);
        self.sum += value;
    }

    /// Number of samples currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the window holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the window is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    /// Window capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mean of the held samples, `None` when empty.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum / self.data.len() as f64)
        }
    }

    /// Sample standard deviation (n − 1 denominator).
    ///
    /// Returns `None` with fewer than 2 samples.
    pub fn std_dev(&self) -> Option<f64> {
        let n = self.data.len();
        if n < 2 {
            return None;
        }
        let mean = self.sum / n as f64;
        let sum_sq: f64 = self.data.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (n - 1) as f64).sqrt())
    }

    /// Most recent sample.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.data.back().copied()
    }

    /// Second most recent sample.
    #[inline]
    pub fn prev(&self) -> Option<f64> {
        let n = self.data.len();
        if n < 2 {
            None
        } else {
            self.data.get(n - 2).copied()
        }
    }

    /// Iterate samples oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// Largest held sample, `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }

    /// Smallest held sample, `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
    }

    /// Copy the last `n` samples (oldest → newest), or fewer when the window
    /// holds fewer.
    pub fn tail(&self, n: usize) -> Vec<f64> {
        let skip = self.data.len().saturating_sub(n);
        self.data.iter().skip(skip).copied().collect()
    }

    /// Copy all samples (oldest → newest).
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.data.clear();
        self.sum = 0.0;
    }
}
