//! Spot price quote returned by the price source.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A USD price for one asset at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Ticker symbol (e.g., "BTC")
    pub symbol: String,

    /// Price API identifier (e.g., "bitcoin")
    pub asset_id: String,

    /// Price in USD, always positive
    pub price: Decimal,

    /// When the price was obtained
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(symbol: &str, asset_id: &str, price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            asset_id: asset_id.to_string(),
            price,
            fetched_at: Utc::now(),
        }
    }
}
