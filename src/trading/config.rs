//! Calculator configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::CalcError;

pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Defaults for scenarios and the price source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Leverage multiplier applied when none is given
    pub default_leverage: u32,

    /// Stop-loss distance below entry, in percent (0 to <100)
    pub default_stop_loss_pct: Decimal,

    /// Profit target above entry, in percent (0 to <100)
    pub default_profit_target_pct: Decimal,

    /// Base URL of the CoinGecko-compatible price API
    pub price_api_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Total time spent retrying transient price fetch failures
    pub retry_budget_secs: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_leverage: 10,                  // x10
            default_stop_loss_pct: dec!(5),        // 5% below entry
            default_profit_target_pct: dec!(10),   // 10% above entry
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            request_timeout_secs: 10,
            retry_budget_secs: 5,
        }
    }
}

impl CalculatorConfig {
    /// Check that the defaults would produce a valid scenario.
    pub fn validate(&self) -> Result<(), CalcError> {
        if self.default_leverage == 0 {
            return Err(CalcError::invalid("leverage", "must be at least 1"));
        }
        check_percent("stop_loss_percent", self.default_stop_loss_pct)?;
        check_percent("profit_target_percent", self.default_profit_target_pct)?;
        if self.request_timeout_secs == 0 {
            return Err(CalcError::invalid("request_timeout_secs", "must be positive"));
        }
        Ok(())
    }
}

/// Percentages of a scenario live in [0, 100).
pub(crate) fn check_percent(field: &'static str, pct: Decimal) -> Result<(), CalcError> {
    if pct < Decimal::ZERO {
        return Err(CalcError::invalid(field, format!("{} must not be negative", pct)));
    }
    if pct >= dec!(100) {
        return Err(CalcError::invalid(field, format!("{} must be less than 100%", pct)));
    }
    Ok(())
}
