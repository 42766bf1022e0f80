use crate::core::PriceEntry;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Thread-safe table of the latest price per currency code.
///
/// Every read and write goes through one lock owned by the store, so a reader sees either
/// the previous or the next value for a code and never a mix. Entries are never expired:
/// a feed that keeps failing simply leaves its last value in place.
#[derive(Clone, Default)]
pub struct PriceStore {
    inner: Arc<Mutex<HashMap<String, PriceEntry>>>,
}

impl PriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the price for `code`. Any value is accepted.
    pub async fn save(&self, code: &str, price: f64) {
        let entry = PriceEntry {
            code: code.to_string(),
            price,
            updated_at: Utc::now(),
        };
        let mut prices = self.inner.lock().await;
        debug!(code, price, "Store SAVE");
        prices.insert(code.to_string(), entry);
    }

    pub async fn get(&self, code: &str) -> Option<f64> {
        self.inner.lock().await.get(code).map(|e| e.price)
    }

    pub async fn entry(&self, code: &str) -> Option<PriceEntry> {
        self.inner.lock().await.get(code).cloned()
    }

    /// Copy of every entry, sorted by code.
    pub async fn snapshot(&self) -> Vec<PriceEntry> {
        let prices = self.inner.lock().await;
        let mut entries: Vec<PriceEntry> = prices.values().cloned().collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// Both prices are units per 1 USD and are read under a single lock hold.
    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Option<f64> {
        let prices = self.inner.lock().await;
        let from_rate = prices.get(from)?.price;
        let to_rate = prices.get(to)?.price;
        if from_rate == 0.0 {
            return None;
        }
        Some(amount * to_rate / from_rate)
    }
}
