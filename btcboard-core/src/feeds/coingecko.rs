//! CoinGecko simple-price feed.
//!
//! `GET /api/v3/simple/price?ids=bitcoin&vs_currencies=usd&include_24hr_change=true&include_market_cap=true`

use super::{get_text, http_client, FeedError, PriceFeed};
use crate::domain::{FeedSource, LiveQuote};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price\
     ?ids=bitcoin&vs_currencies=usd&include_24hr_change=true&include_market_cap=true";

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<CoinQuote>,
}

#[derive(Debug, Deserialize)]
struct CoinQuote {
    usd: f64,
    usd_24h_change: Option<f64>,
    usd_market_cap: Option<f64>,
}

pub struct CoinGeckoFeed {
    client: reqwest::blocking::Client,
    url: String,
}

impl CoinGeckoFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }

    /// Parse a simple-price response body into a live quote.
    ///
    /// A missing 24h change reads as 0%; a missing or zero market cap is
    /// reported as absent.
    pub fn parse_response(body: &str) -> Result<LiveQuote, FeedError> {
        let resp: SimplePriceResponse = serde_json::from_str(body)
            .map_err(|e| FeedError::ResponseFormatChanged(e.to_string()))?;

        let coin = resp
            .bitcoin
            .ok_or_else(|| FeedError::ResponseFormatChanged("no bitcoin entry".into()))?;

        if !(coin.usd.is_finite() && coin.usd > 0.0) {
            return Err(FeedError::ResponseFormatChanged(format!(
                "implausible price: {}",
                coin.usd
            )));
        }

        Ok(LiveQuote {
            price: coin.usd,
            change_24h_pct: coin.usd_24h_change.filter(|c| c.is_finite()).unwrap_or(0.0),
            market_cap: coin.usd_market_cap.filter(|m| m.is_finite() && *m > 0.0),
            source: FeedSource::Live,
        })
    }
}

impl PriceFeed for CoinGeckoFeed {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn fetch_quote(&self) -> Result<LiveQuote, FeedError> {
        let body = get_text(&self.client, &self.url)?;
        Self::parse_response(&body)
    }
}
