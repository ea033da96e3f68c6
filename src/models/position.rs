//! Position scenario models: the request a user describes and what it works out to.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trading::{check_percent, CalcError};

/// A hypothetical leveraged long position to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequest {
    /// Price at which the position is opened
    pub entry_price: Decimal,

    /// Capital committed, in the quote currency
    pub investment_amount: Decimal,

    /// Leverage multiplier on the committed capital
    pub leverage: u32,

    /// Distance of the stop below entry, in percent
    pub stop_loss_percent: Decimal,

    /// Distance of the target above entry, in percent
    pub profit_target_percent: Decimal,
}

impl PositionRequest {
    /// Build a request, rejecting values outside their allowed ranges.
    pub fn new(
        entry_price: Decimal,
        investment_amount: Decimal,
        leverage: u32,
        stop_loss_percent: Decimal,
        profit_target_percent: Decimal,
    ) -> Result<Self, CalcError> {
        let request = Self {
            entry_price,
            investment_amount,
            leverage,
            stop_loss_percent,
            profit_target_percent,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check every field against its range.
    pub fn validate(&self) -> Result<(), CalcError> {
        if self.entry_price <= Decimal::ZERO {
            return Err(CalcError::invalid("entry_price", "must be positive"));
        }
        if self.investment_amount <= Decimal::ZERO {
            return Err(CalcError::invalid("investment_amount", "must be positive"));
        }
        if self.leverage == 0 {
            return Err(CalcError::invalid("leverage", "must be at least 1"));
        }
        check_percent("stop_loss_percent", self.stop_loss_percent)?;
        check_percent("profit_target_percent", self.profit_target_percent)?;
        Ok(())
    }
}

/// Buying power and the asset quantity it controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizing {
    /// Quantity of the asset the leveraged capital buys
    pub position_size: Decimal,

    /// Investment multiplied by leverage
    pub effective_capital: Decimal,
}

/// Everything derived from a [`PositionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionResult {
    pub position_size: Decimal,
    pub effective_capital: Decimal,
    pub stop_loss_price: Decimal,
    pub take_profit_price: Decimal,

    /// Reward over risk; zero when the stop is not below entry
    pub risk_reward_ratio: Decimal,
}

/// Money at stake if either exit is hit.
///
/// Amounts are on the full leveraged position, so a 10% move at x10
/// is a 100% swing on the investment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Loss if price falls to the stop
    pub loss_at_stop: Decimal,

    /// Profit if price reaches the target
    pub profit_at_target: Decimal,

    /// Loss as a fraction of the investment
    pub loss_return: Decimal,

    /// Profit as a fraction of the investment
    pub profit_return: Decimal,
}
