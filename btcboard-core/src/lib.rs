//! BTCBoard Core — price history, moving averages, fallback estimates, feeds.
//!
//! This crate contains everything behind the dashboard except rendering:
//! - Domain types (daily price points, newest-first history, live quotes)
//! - CSV history loading with a lazily populated, single-flight cache
//! - Moving-average, fallback-estimate, and previous-close calculators
//! - Live price and AHR999 index feeds
//! - The `Dashboard` context that turns all of it into one `Snapshot` per tick
//!
//! Data problems never surface as errors from a refresh: they become empty
//! histories, insufficient-data markers, or estimates, each a distinct
//! variant so the display layer can tell them apart.

pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod feeds;
pub mod indicators;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{AverageReport, AverageSource, Dashboard, FallbackReason, SetupError, Snapshot};
