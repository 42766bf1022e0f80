//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use currency::{ETH_SYMBOL, invert_price};
pub use error::FeedError;
pub use price::{Conversion, FeedProvider, FetchResult, PriceEntry};
