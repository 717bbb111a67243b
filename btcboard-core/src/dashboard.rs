//! Dashboard context: owns the history store and feeds, produces snapshots.
//!
//! Every refresh yields a complete `Snapshot`. Feed failures are replaced
//! by the configured fallback constants, a missing history by fallback
//! estimates. Nothing in here returns an error to the caller.

use crate::config::DashboardConfig;
use crate::data::{provider_for, DataError, HistoryProvider, HistoryStore};
use crate::domain::{FeedSource, LiveQuote, PriceHistory};
use crate::feeds::{Ahr999Feed, CoinGeckoFeed, FeedError, IndexFeed, IndexReading, PriceFeed};
use crate::indicators::{
    compare, Comparison, FallbackEstimator, MaValue, MovingAverageCalculator, MovingAverages,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a dashboard (never raised by a refresh).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    History(#[from] DataError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Why the averages are estimates rather than computed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// History could not be loaded or had no usable rows.
    EmptyHistory,
    /// An average over real history came out non-finite.
    NonFiniteAverage { period: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AverageSource {
    History { records: usize },
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageReport {
    pub source: AverageSource,
    pub averages: MovingAverages,
}

impl AverageReport {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AverageSource::Fallback(_))
    }
}

/// Everything the display layer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub taken_at: NaiveDateTime,
    pub quote: LiveQuote,
    pub averages: AverageReport,
    pub comparison: Comparison,
    pub index: IndexReading,
}

pub struct Dashboard {
    config: DashboardConfig,
    store: HistoryStore,
    calculator: MovingAverageCalculator,
    estimator: FallbackEstimator,
    price_feed: Option<Box<dyn PriceFeed>>,
    index_feed: Option<Box<dyn IndexFeed>>,
}

impl Dashboard {
    /// Dashboard wired to the configured history source and live feeds.
    pub fn new(config: DashboardConfig) -> Result<Self, SetupError> {
        let provider = provider_for(&config.history.source, config.history_timeout())?;
        let price_feed = CoinGeckoFeed::new(&config.feeds.price_url, config.feed_timeout())?;
        let index_feed = Ahr999Feed::new(&config.feeds.index_url, config.feed_timeout())?;
        Ok(Self::with_parts(
            config,
            provider,
            Some(Box::new(price_feed)),
            Some(Box::new(index_feed)),
        ))
    }

    /// Dashboard without network feeds: quotes and index come from the
    /// fallback constants unless a price is supplied explicitly.
    pub fn offline(config: DashboardConfig) -> Result<Self, SetupError> {
        let provider = provider_for(&config.history.source, config.history_timeout())?;
        Ok(Self::with_parts(config, provider, None, None))
    }

    pub fn with_parts(
        config: DashboardConfig,
        history: Box<dyn HistoryProvider>,
        price_feed: Option<Box<dyn PriceFeed>>,
        index_feed: Option<Box<dyn IndexFeed>>,
    ) -> Self {
        let calculator = MovingAverageCalculator::new(&config.averages.periods);
        let estimator = FallbackEstimator::new(config.fallback_multipliers());
        Self {
            config,
            store: HistoryStore::new(history),
            calculator,
            estimator,
            price_feed,
            index_feed,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Live quote, or the fallback quote if the feed is missing or fails.
    pub fn current_quote(&self) -> LiveQuote {
        let Some(feed) = &self.price_feed else {
            return self.fallback_quote();
        };
        match feed.fetch_quote() {
            Ok(quote) => {
                tracing::debug!(feed = feed.name(), price = quote.price, "quote updated");
                quote
            }
            Err(e) => {
                tracing::warn!(feed = feed.name(), error = %e, "price feed failed, using fallback quote");
                self.fallback_quote()
            }
        }
    }

    pub fn fallback_quote(&self) -> LiveQuote {
        let fallback = &self.config.fallback;
        LiveQuote {
            price: fallback.price,
            change_24h_pct: fallback.change_24h_pct,
            market_cap: Some(fallback.market_cap),
            source: FeedSource::Fallback,
        }
    }

    /// Live index reading, or the fallback reading.
    pub fn current_index(&self) -> IndexReading {
        let fallback = IndexReading::fallback(self.config.fallback.index_value);
        let Some(feed) = &self.index_feed else {
            return fallback;
        };
        feed.fetch_index().unwrap_or_else(|e| {
            tracing::warn!(feed = feed.name(), error = %e, "index feed failed, using fallback value");
            fallback
        })
    }

    /// Moving averages for `current_price`: computed from history when any
    /// is available, estimated otherwise.
    pub fn averages(&self, current_price: f64) -> AverageReport {
        self.averages_over(&self.store.load(), current_price)
    }

    fn averages_over(&self, history: &PriceHistory, current_price: f64) -> AverageReport {
        if history.is_empty() {
            return self.fallback_report(current_price, FallbackReason::EmptyHistory);
        }

        let averages = self.calculator.compute_all(history, current_price);
        let non_finite = averages.values().find_map(|r| match r.value {
            MaValue::Computed(v) if !v.is_finite() => Some(r.period),
            _ => None,
        });
        if let Some(period) = non_finite {
            return self.fallback_report(current_price, FallbackReason::NonFiniteAverage { period });
        }

        let insufficient = averages.values().filter(|r| r.value.is_insufficient()).count();
        if insufficient > 0 {
            tracing::debug!(records = history.len(), insufficient, "history too short for some averages");
        }

        AverageReport {
            source: AverageSource::History {
                records: history.len(),
            },
            averages,
        }
    }

    fn fallback_report(&self, current_price: f64, reason: FallbackReason) -> AverageReport {
        tracing::warn!(?reason, "using estimated moving averages");
        AverageReport {
            source: AverageSource::Fallback(reason),
            averages: self
                .estimator
                .estimate_all(current_price, self.calculator.periods()),
        }
    }

    /// Current price against the previous close in the history.
    pub fn comparison(&self, current_price: f64) -> Comparison {
        compare(&self.store.load(), current_price)
    }

    /// Full refresh: fetch quote and index, recompute everything.
    pub fn refresh(&self) -> Snapshot {
        let quote = self.current_quote();
        let index = self.current_index();
        self.snapshot_with(quote, index)
    }

    /// Snapshot for a caller-supplied price; feeds are not consulted.
    pub fn snapshot_for_price(&self, price: f64) -> Snapshot {
        self.snapshot_with(
            LiveQuote::manual(price),
            IndexReading::fallback(self.config.fallback.index_value),
        )
    }

    /// Snapshot over one history load, so averages and comparison agree.
    pub fn snapshot_with(&self, quote: LiveQuote, index: IndexReading) -> Snapshot {
        let history = self.store.load();
        let averages = self.averages_over(&history, quote.price);
        let comparison = compare(&history, quote.price);
        Snapshot {
            taken_at: chrono::Local::now().naive_local(),
            quote,
            averages,
            comparison,
            index,
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("store", &self.store)
            .field("periods", &self.calculator.periods())
            .field("price_feed", &self.price_feed.as_ref().map(|feed| feed.name()))
            .field("index_feed", &self.index_feed.as_ref().map(|feed| feed.name()))
            .finish()
    }
}
