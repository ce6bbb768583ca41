//! Core business logic: feed parsing and conversion state

pub mod cache;
pub mod config;
pub mod convert;
pub mod feed;
pub mod log;

// Re-export main types for cleaner imports
pub use convert::{Converter, CurrencyOption};
pub use feed::{CurrencyRate, DailyRateData, FeedError, RateFeedProvider, parse_daily_feed};
