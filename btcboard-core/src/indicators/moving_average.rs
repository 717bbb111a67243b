//! Simple moving averages over the newest N daily closes.
//!
//! MA-P is the arithmetic mean of the P most recent prices (indices
//! `0..P` of the newest-first history). With fewer than P prices the
//! result is `MaValue::Insufficient`, never a number.

use crate::domain::PriceHistory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lookback windows shown on the dashboard, in days.
pub const DEFAULT_PERIODS: [usize; 6] = [50, 200, 300, 500, 700, 1400];

/// Results keyed by period, ascending.
pub type MovingAverages = BTreeMap<usize, MovingAverageResult>;

/// Value of one moving average, tagged with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MaValue {
    /// Mean of real historical prices.
    Computed(f64),
    /// Synthetic value derived from the current price.
    Estimated(f64),
    /// Fewer samples than the period requires.
    Insufficient { available: usize },
}

impl MaValue {
    /// Numeric value, if there is one.
    pub fn value(&self) -> Option<f64> {
        match *self {
            MaValue::Computed(v) | MaValue::Estimated(v) => Some(v),
            MaValue::Insufficient { .. } => None,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, MaValue::Estimated(_))
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, MaValue::Insufficient { .. })
    }
}

/// One moving average and where the current price sits relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageResult {
    /// Window length in samples.
    pub period: usize,
    pub value: MaValue,
    /// `Some(true)` when the current price is strictly above the average,
    /// `None` when there is no average to compare against.
    pub price_above: Option<bool>,
}

impl MovingAverageResult {
    pub fn computed(period: usize, average: f64, current_price: f64) -> Self {
        Self {
            period,
            value: MaValue::Computed(average),
            price_above: Some(current_price > average),
        }
    }

    pub fn estimated(period: usize, estimate: f64, current_price: f64) -> Self {
        Self {
            period,
            value: MaValue::Estimated(estimate),
            price_above: Some(current_price > estimate),
        }
    }

    pub fn insufficient(period: usize, available: usize) -> Self {
        Self {
            period,
            value: MaValue::Insufficient { available },
            price_above: None,
        }
    }

    pub fn is_estimate(&self) -> bool {
        self.value.is_estimate()
    }
}

/// Mean of the `period` newest prices, or `None` if the history is too
/// short. A zero period has no mean.
pub fn simple_average(history: &PriceHistory, period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let window = history.recent(period)?;
    let sum: f64 = window.iter().map(|p| p.price).sum();
    Some(sum / period as f64)
}

/// Computes every configured moving average in one pass over the periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingAverageCalculator {
    periods: Vec<usize>,
}

impl MovingAverageCalculator {
    /// Periods are kept sorted and deduplicated.
    pub fn new(periods: &[usize]) -> Self {
        let mut periods = periods.to_vec();
        periods.sort_unstable();
        periods.dedup();
        Self { periods }
    }

    pub fn periods(&self) -> &[usize] {
        &self.periods
    }

    pub fn compute_all(&self, history: &PriceHistory, current_price: f64) -> MovingAverages {
        self.periods
            .iter()
            .map(|&period| {
                let result = match simple_average(history, period) {
                    Some(average) => MovingAverageResult::computed(period, average, current_price),
                    None => MovingAverageResult::insufficient(period, history.len()),
                };
                (period, result)
            })
            .collect()
    }
}

impl Default for MovingAverageCalculator {
    fn default() -> Self {
        Self::new(&DEFAULT_PERIODS)
    }
}
