//! Price source: asset registry and CoinGecko client.

pub mod assets;
mod price_client;
mod types;

pub use assets::Asset;
pub use price_client::{PriceClient, PriceSource};
