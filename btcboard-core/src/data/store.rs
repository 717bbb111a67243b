//! Lazily loaded, shared price history.
//!
//! The first caller loads the table; later callers reuse it. The cache
//! slot is held under a mutex for the whole load, so callers that arrive
//! while a load is in flight wait for it instead of issuing their own.
//!
//! An empty result (unreachable resource, parse failure, or no usable
//! rows) is not cached: the next call tries again.

use super::csv_history::parse_history;
use super::provider::{DataError, HistoryProvider};
use crate::domain::PriceHistory;
use std::sync::{Arc, Mutex, PoisonError};

pub struct HistoryStore {
    provider: Box<dyn HistoryProvider>,
    cached: Mutex<Option<Arc<PriceHistory>>>,
}

impl HistoryStore {
    pub fn new(provider: Box<dyn HistoryProvider>) -> Self {
        Self {
            provider,
            cached: Mutex::new(None),
        }
    }

    /// Cached history, without triggering a load.
    pub fn cached(&self) -> Option<Arc<PriceHistory>> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.cached().is_some()
    }

    /// Load (once) and return the history, or the reason it could not be
    /// loaded.
    pub fn try_load(&self) -> Result<Arc<PriceHistory>, DataError> {
        let mut slot = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(history) = slot.as_ref() {
            return Ok(Arc::clone(history));
        }

        let text = self.provider.fetch_text()?;
        let report = parse_history(&text)?;
        let history = Arc::new(report.history);

        match history.date_range() {
            Some((oldest, newest)) => {
                tracing::info!(
                    source = self.provider.name(),
                    records = history.len(),
                    %oldest,
                    %newest,
                    skipped = report.skipped_short,
                    dropped = report.dropped_invalid,
                    "price history loaded"
                );
                *slot = Some(Arc::clone(&history));
            }
            None => {
                tracing::warn!(source = self.provider.name(), "price history has no usable rows");
            }
        }

        Ok(history)
    }

    /// Load (once) and return the history. Never fails: any problem yields
    /// an empty history.
    pub fn load(&self) -> Arc<PriceHistory> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(source = self.provider.name(), error = %e, "price history unavailable");
            Arc::new(PriceHistory::empty())
        })
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("source", &self.provider.name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
