//! PricePoint and PriceHistory — the daily close series behind every average.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily closing price in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// A usable point has a finite, strictly positive price.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Daily prices ordered by date, newest first.
///
/// Construction sorts once (stable, so rows sharing a date keep their input
/// order). Nothing mutates the sequence afterwards; the loader shares it
/// behind an `Arc` for the rest of the session.
///
/// Only `Serialize` is derived: deserializing would bypass the ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by(|a, b| b.date.cmp(&a.date));
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    /// Point at `index` counted from the newest (0 = most recent).
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn oldest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The `n` most recent points, or `None` if fewer than `n` exist.
    pub fn recent(&self, n: usize) -> Option<&[PricePoint]> {
        self.points.get(..n)
    }

    /// `(oldest, newest)` dates covered by the history.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.oldest()?.date, self.latest()?.date))
    }
}

impl<'a> IntoIterator for &'a PriceHistory {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<PricePoint> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
