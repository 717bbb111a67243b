//! Live quote for the spot price, as supplied by a price feed.

use serde::{Deserialize, Serialize};

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Live,
    Fallback,
    /// Supplied by the caller (e.g. `--price`).
    Manual,
}

/// Spot price with its 24h change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveQuote {
    /// Spot price in USD.
    pub price: f64,
    /// 24h change in percent (2.5 means +2.5%).
    pub change_24h_pct: f64,
    /// Market capitalisation in USD, when the feed reports one.
    pub market_cap: Option<f64>,
    pub source: FeedSource,
}

impl LiveQuote {
    /// Absolute USD move implied by the 24h change.
    pub fn change_amount(&self) -> f64 {
        self.price * self.change_24h_pct.abs() / 100.0
    }

    /// Zero change counts as positive.
    pub fn is_positive(&self) -> bool {
        self.change_24h_pct >= 0.0
    }

    pub fn is_fallback(&self) -> bool {
        self.source == FeedSource::Fallback
    }

    /// Quote for a caller-supplied price; change and market cap are unknown.
    pub fn manual(price: f64) -> Self {
        Self {
            price,
            change_24h_pct: 0.0,
            market_cap: None,
            source: FeedSource::Manual,
        }
    }
}
