//! Historical price loading and caching

pub mod csv_history;
pub mod provider;
pub mod store;

pub use csv_history::{parse_date, parse_history, ParseReport};
pub use provider::{
    provider_for, DataError, FileHistory, HistoryProvider, HistorySource, HttpHistory,
};
pub use store::HistoryStore;
