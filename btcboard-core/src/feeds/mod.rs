//! Live feeds: spot price and the AHR999 valuation index.
//!
//! Feeds are thin HTTP adapters. They report failures as `FeedError`;
//! substituting fallback constants is the dashboard's job.

pub mod ahr999;
pub mod coingecko;

pub use ahr999::{Ahr999Feed, IndexReading, IndexZone};
pub use coingecko::CoinGeckoFeed;

use crate::domain::LiveQuote;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("feed returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

/// Source of the current spot price.
pub trait PriceFeed: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_quote(&self) -> Result<LiveQuote, FeedError>;
}

/// Source of the AHR999 index value.
pub trait IndexFeed: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_index(&self) -> Result<IndexReading, FeedError>;
}

fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, FeedError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("btcboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FeedError::NetworkUnreachable(format!("HTTP client: {e}")))
}

/// GET `url` and return the body of a successful response.
fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, FeedError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| FeedError::NetworkUnreachable(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FeedError::HttpStatus {
            status: status.as_u16(),
        });
    }

    resp.text()
        .map_err(|e| FeedError::ResponseFormatChanged(format!("unreadable body: {e}")))
}
