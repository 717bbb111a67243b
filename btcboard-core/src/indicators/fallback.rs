//! Fallback estimates for when no price history is available.
//!
//! Each estimate is a fixed fraction of the current price. The result set
//! is always complete: periods without a multiplier are reported as
//! insufficient instead of being left out.

use super::moving_average::{MovingAverageResult, MovingAverages};
use std::collections::BTreeMap;

/// Period → multiplier applied to the current price.
pub const DEFAULT_MULTIPLIERS: [(usize, f64); 6] = [
    (50, 0.98),
    (200, 0.92),
    (300, 0.88),
    (500, 0.82),
    (700, 0.78),
    (1400, 0.65),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackEstimator {
    multipliers: BTreeMap<usize, f64>,
}

impl FallbackEstimator {
    pub fn new(multipliers: impl IntoIterator<Item = (usize, f64)>) -> Self {
        Self {
            multipliers: multipliers.into_iter().collect(),
        }
    }

    pub fn multiplier(&self, period: usize) -> Option<f64> {
        self.multipliers.get(&period).copied()
    }

    /// Estimate for one period; `Insufficient { available: 0 }` when the
    /// table has no entry for it.
    pub fn estimate(&self, period: usize, current_price: f64) -> MovingAverageResult {
        match self.multiplier(period) {
            Some(m) => MovingAverageResult::estimated(period, current_price * m, current_price),
            None => MovingAverageResult::insufficient(period, 0),
        }
    }

    pub fn estimate_all(&self, current_price: f64, periods: &[usize]) -> MovingAverages {
        periods
            .iter()
            .map(|&period| (period, self.estimate(period, current_price)))
            .collect()
    }
}

impl Default for FallbackEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MULTIPLIERS)
    }
}
