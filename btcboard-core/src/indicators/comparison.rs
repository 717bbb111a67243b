//! Current price versus the previous close.
//!
//! The reference is positional: index 1 of the newest-first history, i.e.
//! the second row of the loaded data, whatever date it carries.

use crate::domain::PriceHistory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    /// The current price was not a finite number.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub previous_date: NaiveDate,
    pub previous_price: f64,
    /// Percent change (1.5 means +1.5%).
    pub percent_change: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparison {
    Available(ComparisonResult),
    /// Fewer than two historical prices.
    InsufficientData { available: usize },
}

impl Comparison {
    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            Comparison::Available(r) => Some(r),
            Comparison::InsufficientData { .. } => None,
        }
    }
}

pub fn compare(history: &PriceHistory, current_price: f64) -> Comparison {
    let Some(previous) = history.get(1) else {
        return Comparison::InsufficientData {
            available: history.len(),
        };
    };

    let percent_change = (current_price - previous.price) / previous.price * 100.0;
    let direction = if !current_price.is_finite() {
        Direction::Unknown
    } else if current_price >= previous.price {
        Direction::Up
    } else {
        Direction::Down
    };

    Comparison::Available(ComparisonResult {
        previous_date: previous.date,
        previous_price: previous.price,
        percent_change,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use crate::indicators::{assert_approx, make_history, DEFAULT_EPSILON};

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn uses_second_row_as_reference() {
        let history = PriceHistory::new(vec![
            PricePoint::new(june(1), 59_000.0),
            PricePoint::new(june(2), 60_000.0),
        ]);
        let result = *compare(&history, 61_000.0).result().unwrap();
        assert_eq!(result.previous_date, june(1));
        assert_eq!(result.previous_price, 59_000.0);
        assert_approx(
            result.percent_change,
            2_000.0 / 59_000.0 * 100.0,
            DEFAULT_EPSILON,
        );
        assert_eq!(result.direction, Direction::Up);
    }

    #[test]
    fn reference_is_positional_not_calendar() {
        // second row is a week older than the first
        let history = PriceHistory::new(vec![
            PricePoint::new(june(10), 100.0),
            PricePoint::new(june(3), 80.0),
        ]);
        let result = *compare(&history, 100.0).result().unwrap();
        assert_eq!(result.previous_date, june(3));
        assert_approx(result.percent_change, 25.0, DEFAULT_EPSILON);
    }

    #[test]
    fn lower_price_is_down() {
        let history = make_history(&[100.0, 200.0]);
        let result = *compare(&history, 150.0).result().unwrap();
        assert_approx(result.percent_change, -25.0, DEFAULT_EPSILON);
        assert_eq!(result.direction, Direction::Down);
    }

    #[test]
    fn unchanged_price_is_up() {
        let history = make_history(&[100.0, 200.0]);
        let result = *compare(&history, 200.0).result().unwrap();
        assert_eq!(result.percent_change, 0.0);
        assert_eq!(result.direction, Direction::Up);
    }

    #[test]
    fn nan_price_direction_unknown() {
        let history = make_history(&[100.0, 200.0]);
        let result = *compare(&history, f64::NAN).result().unwrap();
        assert_eq!(result.direction, Direction::Unknown);
    }

    #[test]
    fn fewer_than_two_points_is_insufficient() {
        assert_eq!(
            compare(&PriceHistory::empty(), 1.0),
            Comparison::InsufficientData { available: 0 }
        );
        assert_eq!(
            compare(&make_history(&[100.0]), 1.0),
            Comparison::InsufficientData { available: 1 }
        );
    }
}
