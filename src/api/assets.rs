//! Supported crypto assets and their CoinGecko identifiers.

use thiserror::Error;

/// A tradeable asset known to the price API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    /// Ticker symbol, uppercase
    pub symbol: &'static str,
    /// CoinGecko coin id
    pub id: &'static str,
}

const fn asset(symbol: &'static str, id: &'static str) -> Asset {
    Asset { symbol, id }
}

/// Every asset the calculator can price.
pub const ASSETS: &[Asset] = &[
    asset("BTC", "bitcoin"),
    asset("ETH", "ethereum"),
    asset("SOL", "solana"),
    asset("ADA", "cardano"),
    asset("XRP", "ripple"),
    asset("DOT", "polkadot"),
    asset("DOGE", "dogecoin"),
    asset("MATIC", "matic-network"),
    asset("AVAX", "avalanche-2"),
    asset("ARB", "arbitrum"),
    asset("OP", "optimism"),
    asset("LINK", "chainlink"),
    asset("UNI", "uniswap"),
    asset("AAVE", "aave"),
    asset("LTC", "litecoin"),
    asset("BCH", "bitcoin-cash"),
];

/// Symbol that is not in [`ASSETS`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Asset '{symbol}' not found. Available: {available}")]
pub struct UnknownAsset {
    pub symbol: String,
    pub available: String,
}

/// Find an asset by ticker, ignoring case and surrounding whitespace.
pub fn lookup(symbol: &str) -> Result<&'static Asset, UnknownAsset> {
    let wanted = symbol.trim().to_uppercase();

    ASSETS
        .iter()
        .find(|a| a.symbol == wanted)
        .ok_or_else(|| UnknownAsset {
            symbol: symbol.trim().to_string(),
            available: available_symbols().join(", "),
        })
}

/// Supported tickers in alphabetical order.
pub fn available_symbols() -> Vec<&'static str> {
    let mut symbols: Vec<_> = ASSETS.iter().map(|a| a.symbol).collect();
    symbols.sort_unstable();
    symbols
}
