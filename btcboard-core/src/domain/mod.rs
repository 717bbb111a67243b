//! Domain types for BTCBoard

pub mod price;
pub mod quote;

pub use price::{PriceHistory, PricePoint};
pub use quote::{FeedSource, LiveQuote};
