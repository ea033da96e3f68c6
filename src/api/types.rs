//! API response types for the CoinGecko simple price endpoint.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Prices of one coin keyed by quote currency; only USD is requested.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinPrices {
    #[serde(default)]
    pub usd: Option<Decimal>,
}

/// Response from /simple/price, keyed by coin id.
///
/// ```json
/// {"bitcoin": {"usd": 67321.5}}
/// ```
pub type SimplePriceResponse = HashMap<String, CoinPrices>;
