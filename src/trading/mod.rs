//! Trading math: leveraged position sizing, exit prices, risk/reward.

mod config;
mod error;
mod leverage;

pub use config::{CalculatorConfig, DEFAULT_PRICE_API_URL};
pub(crate) use config::check_percent;
pub use error::CalcError;
pub use leverage::LeverageCalculator;
