//! Property tests for the calculators.
//!
//! Uses proptest to verify:
//! 1. MA-P equals the mean of the newest P prices whenever P <= len
//! 2. MA-P is insufficient, never numeric, whenever P > len
//! 3. Estimates are always tagged and sit below a positive current price
//! 4. The previous-close comparison follows its formula exactly
//! 5. Short CSV lines never abort parsing of the lines after them

use btcboard_core::data::parse_history;
use btcboard_core::domain::{PriceHistory, PricePoint};
use btcboard_core::indicators::{
    compare, Comparison, Direction, FallbackEstimator, MaValue, MovingAverageCalculator,
    DEFAULT_PERIODS,
};
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..200_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 0..max_len)
}

/// History with one point per day, prices given oldest first.
fn history_from(prices: &[f64]) -> PriceHistory {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
        .collect()
}

// ── 1 & 2. Moving averages ───────────────────────────────────────────

proptest! {
    #[test]
    fn average_matches_mean_of_newest_window(
        prices in arb_prices(300),
        period in 1usize..120,
        current in arb_price(),
    ) {
        let history = history_from(&prices);
        let results = MovingAverageCalculator::new(&[period]).compute_all(&history, current);
        let result = results[&period];

        if prices.len() >= period {
            // oldest-first input, so the newest window is the tail
            let window = &prices[prices.len() - period..];
            let expected = window.iter().sum::<f64>() / period as f64;
            match result.value {
                MaValue::Computed(v) => {
                    prop_assert!((v - expected).abs() <= 1e-9 * expected.abs().max(1.0));
                }
                other => prop_assert!(false, "expected computed, got {:?}", other),
            }
            prop_assert_eq!(result.price_above, Some(current > expected));
        } else {
            prop_assert_eq!(result.value, MaValue::Insufficient { available: prices.len() });
            prop_assert_eq!(result.price_above, None);
        }
        prop_assert!(!result.is_estimate());
    }

    #[test]
    fn input_order_does_not_matter(
        prices in arb_prices(80),
        current in arb_price(),
    ) {
        let history = history_from(&prices);
        let mut shuffled: Vec<PricePoint> = history.points().to_vec();
        shuffled.reverse();
        let reordered = PriceHistory::new(shuffled);

        let calc = MovingAverageCalculator::new(&[1, 7, 30]);
        prop_assert_eq!(calc.compute_all(&history, current), calc.compute_all(&reordered, current));
    }
}

// ── 3. Fallback estimates ────────────────────────────────────────────

proptest! {
    #[test]
    fn estimates_are_tagged_and_below_price(current in arb_price()) {
        let results = FallbackEstimator::default().estimate_all(current, &DEFAULT_PERIODS);
        prop_assert_eq!(results.len(), DEFAULT_PERIODS.len());
        for result in results.values() {
            prop_assert!(result.is_estimate());
            let value = result.value.value().unwrap();
            prop_assert!(value < current);
            prop_assert_eq!(result.price_above, Some(true));
        }
    }
}

// ── 4. Previous-close comparison ─────────────────────────────────────

proptest! {
    #[test]
    fn comparison_follows_formula(
        prices in arb_prices(50),
        current in arb_price(),
    ) {
        let history = history_from(&prices);
        match compare(&history, current) {
            Comparison::InsufficientData { available } => {
                prop_assert!(prices.len() < 2);
                prop_assert_eq!(available, prices.len());
            }
            Comparison::Available(result) => {
                prop_assert!(prices.len() >= 2);
                let previous = prices[prices.len() - 2];
                prop_assert_eq!(result.previous_price, previous);
                let expected = (current - previous) / previous * 100.0;
                prop_assert!((result.percent_change - expected).abs() < 1e-9);
                let expected_direction = if current >= previous { Direction::Up } else { Direction::Down };
                prop_assert_eq!(result.direction, expected_direction);
            }
        }
    }
}

// ── 5. CSV parsing ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_lines_never_abort_parsing(
        prices in prop::collection::vec(arb_price(), 1..40),
        junk_every in 1usize..5,
    ) {
        let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let mut text = String::from("date,price\n");
        let mut junk = 0;
        for (i, price) in prices.iter().enumerate() {
            if i % junk_every == 0 {
                text.push_str("garbage\n");
                junk += 1;
            }
            let date = start + chrono::Duration::days(i as i64);
            text.push_str(&format!("{date},{price}\n"));
        }

        let report = parse_history(&text).unwrap();
        prop_assert_eq!(report.history.len(), prices.len());
        prop_assert_eq!(report.skipped_short, junk);
        prop_assert_eq!(report.history.latest().unwrap().price, *prices.last().unwrap());
    }
}

// ── Worked examples ──────────────────────────────────────────────────

#[test]
fn thirty_days_is_insufficient_for_ma50() {
    let history = history_from(&[60_000.0; 30]);
    let results = MovingAverageCalculator::new(&[50]).compute_all(&history, 61_000.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[&50].value, MaValue::Insufficient { available: 30 });
}

#[test]
fn ma200_estimate_at_one_hundred_thousand() {
    let results = FallbackEstimator::default().estimate_all(100_000.0, &[200]);
    let ma200 = results[&200];
    assert!((ma200.value.value().unwrap() - 92_000.0).abs() < 1e-6);
    assert!(ma200.is_estimate());
    assert_eq!(ma200.price_above, Some(true));
}

#[test]
fn two_day_history_comparison() {
    let history = history_from(&[59_000.0, 60_000.0]);
    let result = *compare(&history, 61_000.0).result().unwrap();
    assert_eq!(result.previous_price, 59_000.0);
    assert_eq!(result.direction, Direction::Up);
    assert!((result.percent_change - 3.389_830_508_474_576).abs() < 1e-9);
}
