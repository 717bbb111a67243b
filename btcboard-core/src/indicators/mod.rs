//! Price-derived indicators.
//!
//! Everything here is a pure function of a `PriceHistory` and the current
//! spot price. There is no hidden state: the same inputs always give the
//! same output, so a scheduler can re-run them on every tick.
//!
//! Each moving-average result says which branch produced it (`MaValue`):
//! a real average, a fallback estimate, or "not enough history". Display
//! code renders those differently, so they are never folded together.

pub mod comparison;
pub mod fallback;
pub mod moving_average;

pub use comparison::{compare, Comparison, ComparisonResult, Direction};
pub use fallback::{FallbackEstimator, DEFAULT_MULTIPLIERS};
pub use moving_average::{
    simple_average, MaValue, MovingAverageCalculator, MovingAverageResult, MovingAverages,
    DEFAULT_PERIODS,
};

/// Build a history from prices listed newest first, one per day.
#[cfg(test)]
pub fn make_history(prices_newest_first: &[f64]) -> crate::domain::PriceHistory {
    use crate::domain::{PriceHistory, PricePoint};
    let newest = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let points = prices_newest_first
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint::new(newest - chrono::Duration::days(i as i64), price))
        .collect();
    PriceHistory::new(points)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
