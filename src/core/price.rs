//! Pricing abstractions and core types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::core::error::FeedError;

/// Latest known price of one currency, expressed as units per 1 USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub code: String,
    pub price: f64,
    pub updated_at: DateTime<Utc>,
}

/// What a feed did to upstream values before handing them over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Upstream already publishes units per 1 USD.
    Direct,
    /// Upstream publishes USD per 1 unit; values were inverted.
    Inverted,
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Conversion::Direct => "direct",
                Conversion::Inverted => "inverted",
            }
        )
    }
}

/// Quotes produced by one successful fetch, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub quotes: Vec<(String, f64)>,
    pub conversion: Conversion,
}

impl FetchResult {
    pub fn new(quotes: Vec<(String, f64)>, conversion: Conversion) -> Self {
        Self { quotes, conversion }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// One upstream price source.
///
/// A fetch either returns every quote it will contribute this cycle or an error; it never
/// returns a partial set after a failure.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<FetchResult, FeedError>;
}
