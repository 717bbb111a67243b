//! Dashboard configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock dashboard:
//!
//! ```toml
//! [history]
//! source = "btc-price.csv"
//! timeout_secs = 30
//!
//! [averages]
//! periods = [50, 200, 300, 500, 700, 1400]
//!
//! [[averages.fallback]]
//! period = 50
//! multiplier = 0.98
//!
//! [schedule]
//! refresh_secs = 300
//! clock_secs = 60
//! ```

use crate::data::HistorySource;
use crate::feeds::ahr999::DEFAULT_INDEX_URL;
use crate::feeds::coingecko::DEFAULT_PRICE_URL;
use crate::indicators::{DEFAULT_MULTIPLIERS, DEFAULT_PERIODS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub history: HistoryConfig,
    pub averages: AveragesConfig,
    pub feeds: FeedsConfig,
    pub schedule: ScheduleConfig,
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path or `http(s)://` URL of the `date,price` table.
    pub source: HistorySource,
    pub timeout_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            source: HistorySource::default(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackMultiplier {
    pub period: usize,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AveragesConfig {
    pub periods: Vec<usize>,
    /// Multipliers used when no history is available.
    pub fallback: Vec<FallbackMultiplier>,
}

impl Default for AveragesConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS.to_vec(),
            fallback: DEFAULT_MULTIPLIERS
                .iter()
                .map(|&(period, multiplier)| FallbackMultiplier { period, multiplier })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub price_url: String,
    pub index_url: String,
    pub timeout_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            price_url: DEFAULT_PRICE_URL.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between full refreshes.
    pub refresh_secs: u64,
    /// Seconds between clock updates.
    pub clock_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_secs: 300,
            clock_secs: 60,
        }
    }
}

/// Constants shown when the live feeds are down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub price: f64,
    pub change_24h_pct: f64,
    pub market_cap: f64,
    pub index_value: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            price: 115_000.0,
            change_24h_pct: 2.45,
            market_cap: 2.3e12,
            index_value: 1.05,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.averages.periods.is_empty() {
            return Err(ConfigError::Invalid("averages.periods is empty".into()));
        }
        if self.averages.periods.contains(&0) {
            return Err(ConfigError::Invalid("averages.periods must be >= 1".into()));
        }
        for entry in &self.averages.fallback {
            if !(entry.multiplier.is_finite() && entry.multiplier > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "fallback multiplier for period {} must be positive, got {}",
                    entry.period, entry.multiplier
                )));
            }
        }
        if let Some(period) = self
            .averages
            .periods
            .iter()
            .find(|&&p| !self.averages.fallback.iter().any(|entry| entry.period == p))
        {
            return Err(ConfigError::Invalid(format!(
                "averages.periods includes {period} but [[averages.fallback]] has no multiplier for it"
            )));
        }
        if self.schedule.refresh_secs == 0 || self.schedule.clock_secs == 0 {
            return Err(ConfigError::Invalid("schedule intervals must be > 0".into()));
        }
        if self.history.timeout_secs == 0 || self.feeds.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be > 0".into()));
        }
        if !(self.fallback.price.is_finite() && self.fallback.price > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fallback.price must be positive, got {}",
                self.fallback.price
            )));
        }
        Ok(())
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history.timeout_secs)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feeds.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.refresh_secs)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.clock_secs)
    }

    pub fn fallback_multipliers(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.averages
            .fallback
            .iter()
            .map(|entry| (entry.period, entry.multiplier))
    }
}
