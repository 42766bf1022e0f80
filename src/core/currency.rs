//! Supported currency codes and unit conversion helpers

use crate::core::error::FeedError;

/// Code under which the crypto feed stores its inverted ether price.
pub const ETH_SYMBOL: &str = "ETH";

/// Codes tracked when the configuration does not list any.
pub const DEFAULT_CURRENCIES: [&str; 5] = ["USD", "BRL", "EUR", "BTC", ETH_SYMBOL];

pub fn default_currencies() -> Vec<String> {
    DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
}

/// Turns "USD per 1 unit" into "units per 1 USD".
///
/// A zero price has no inverse and is rejected instead of producing infinity.
pub fn invert_price(price: f64) -> Result<f64, FeedError> {
    if price == 0.0 {
        return Err(FeedError::Data("cannot invert a zero price".to_string()));
    }
    let inverted = 1.0 / price;
    if !inverted.is_finite() {
        return Err(FeedError::Data(format!("inverse of {price} is not finite")));
    }
    Ok(inverted)
}
