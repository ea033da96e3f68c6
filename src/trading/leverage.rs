//! Leveraged position math: sizing, stop-loss, take-profit, risk/reward.
//!
//! Every function here is pure and synchronous. Nothing is rounded;
//! formatting for display happens in the report layer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::models::{PositionRequest, PositionResult, PositionSizing, ScenarioOutcome};
use super::CalcError;

const HUNDRED: Decimal = dec!(100);

/// Calculator for leveraged long positions.
pub struct LeverageCalculator;

impl LeverageCalculator {
    /// Size a position from an investment and a leverage multiplier.
    ///
    /// effective_capital = investment * leverage
    /// position_size     = effective_capital / entry_price
    pub fn compute_position(
        entry_price: Decimal,
        investment_amount: Decimal,
        leverage: u32,
    ) -> Result<PositionSizing, CalcError> {
        if entry_price <= Decimal::ZERO {
            return Err(CalcError::invalid("entry_price", "must be positive"));
        }
        if investment_amount <= Decimal::ZERO {
            return Err(CalcError::invalid("investment_amount", "must be positive"));
        }
        if leverage == 0 {
            return Err(CalcError::invalid("leverage", "must be at least 1"));
        }

        let effective_capital = investment_amount
            .checked_mul(Decimal::from(leverage))
            .ok_or_else(|| CalcError::invalid("investment_amount", "too large to leverage"))?;
        let position_size = effective_capital
            .checked_div(entry_price)
            .ok_or_else(|| CalcError::invalid("entry_price", "too small for this investment"))?;

        Ok(PositionSizing {
            position_size,
            effective_capital,
        })
    }

    /// Stop-loss price: entry * (1 - pct / 100).
    ///
    /// Percentages of 100 or more would put the stop at or below zero.
    pub fn compute_stop_loss(
        entry_price: Decimal,
        stop_loss_percent: Decimal,
    ) -> Result<Decimal, CalcError> {
        if entry_price <= Decimal::ZERO {
            return Err(CalcError::invalid("entry_price", "must be positive"));
        }
        if stop_loss_percent < Decimal::ZERO {
            return Err(CalcError::invalid("stop_loss_percent", "must not be negative"));
        }
        if stop_loss_percent >= HUNDRED {
            return Err(CalcError::invalid(
                "stop_loss_percent",
                "must be less than 100%",
            ));
        }

        Ok(entry_price * (Decimal::ONE - stop_loss_percent / HUNDRED))
    }

    /// Take-profit price: entry * (1 + pct / 100).
    pub fn compute_take_profit(
        entry_price: Decimal,
        profit_target_percent: Decimal,
    ) -> Result<Decimal, CalcError> {
        if entry_price <= Decimal::ZERO {
            return Err(CalcError::invalid("entry_price", "must be positive"));
        }
        if profit_target_percent < Decimal::ZERO {
            return Err(CalcError::invalid(
                "profit_target_percent",
                "must not be negative",
            ));
        }

        entry_price
            .checked_mul(Decimal::ONE + profit_target_percent / HUNDRED)
            .ok_or_else(|| CalcError::invalid("profit_target_percent", "target price overflows"))
    }

    /// Reward over risk, measured from the entry price.
    ///
    /// Returns zero instead of failing when the stop is not below entry
    /// (risk <= 0) or any step is not representable.
    pub fn compute_risk_reward(
        entry_price: Decimal,
        stop_loss_price: Decimal,
        take_profit_price: Decimal,
    ) -> Decimal {
        let (Some(risk), Some(reward)) = (
            entry_price.checked_sub(stop_loss_price),
            take_profit_price.checked_sub(entry_price),
        ) else {
            return Decimal::ZERO;
        };

        if risk <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        reward.checked_div(risk).unwrap_or(Decimal::ZERO)
    }

    /// Run all four formulas for one request.
    pub fn evaluate(request: &PositionRequest) -> Result<PositionResult, CalcError> {
        request.validate()?;

        let sizing = Self::compute_position(
            request.entry_price,
            request.investment_amount,
            request.leverage,
        )?;
        let stop_loss_price = Self::compute_stop_loss(request.entry_price, request.stop_loss_percent)?;
        let take_profit_price =
            Self::compute_take_profit(request.entry_price, request.profit_target_percent)?;
        let risk_reward_ratio =
            Self::compute_risk_reward(request.entry_price, stop_loss_price, take_profit_price);

        debug!(
            entry = %request.entry_price,
            size = %sizing.position_size,
            stop = %stop_loss_price,
            target = %take_profit_price,
            ratio = %risk_reward_ratio,
            "Evaluated position"
        );

        Ok(PositionResult {
            position_size: sizing.position_size,
            effective_capital: sizing.effective_capital,
            stop_loss_price,
            take_profit_price,
            risk_reward_ratio,
        })
    }

    /// P&L of the leveraged position at each exit.
    pub fn outcome(request: &PositionRequest, result: &PositionResult) -> ScenarioOutcome {
        let loss_at_stop = result.position_size * (request.entry_price - result.stop_loss_price);
        let profit_at_target =
            result.position_size * (result.take_profit_price - request.entry_price);

        let (loss_return, profit_return) = if request.investment_amount.is_zero() {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            (
                loss_at_stop / request.investment_amount,
                profit_at_target / request.investment_amount,
            )
        };

        ScenarioOutcome {
            loss_at_stop,
            profit_at_target,
            loss_return,
            profit_return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal) {
        let tolerance = expected.abs() * dec!(0.000001);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_position_basic() {
        let sizing = LeverageCalculator::compute_position(dec!(50000), dec!(10000), 10).unwrap();
        assert_eq!(sizing.effective_capital, dec!(100000));
        assert_eq!(sizing.position_size, dec!(2));
    }

    #[test]
    fn test_position_fractional() {
        let sizing = LeverageCalculator::compute_position(dec!(45000), dec!(5000), 10).unwrap();
        assert_close(sizing.position_size, dec!(1.11111111));
    }

    #[test]
    fn test_position_rejects_bad_input() {
        let err = LeverageCalculator::compute_position(Decimal::ZERO, dec!(100), 10).unwrap_err();
        assert_eq!(err.field(), "entry_price");

        let err = LeverageCalculator::compute_position(dec!(100), dec!(-1), 10).unwrap_err();
        assert_eq!(err.field(), "investment_amount");

        let err = LeverageCalculator::compute_position(dec!(100), dec!(100), 0).unwrap_err();
        assert_eq!(err.field(), "leverage");
    }

    #[test]
    fn test_position_overflow_is_rejected() {
        let result = LeverageCalculator::compute_position(dec!(1), Decimal::MAX, 10);
        assert!(result.is_err());
    }

    #[test]
    fn test_stop_loss() {
        assert_eq!(
            LeverageCalculator::compute_stop_loss(dec!(50000), dec!(5)).unwrap(),
            dec!(47500)
        );
        assert_eq!(
            LeverageCalculator::compute_stop_loss(dec!(45000), dec!(10)).unwrap(),
            dec!(40500)
        );
        assert_eq!(
            LeverageCalculator::compute_stop_loss(dec!(123.45), Decimal::ZERO).unwrap(),
            dec!(123.45)
        );
    }

    #[test]
    fn test_stop_loss_bounds() {
        assert!(LeverageCalculator::compute_stop_loss(dec!(50000), dec!(100)).is_err());
        assert!(LeverageCalculator::compute_stop_loss(dec!(50000), dec!(150)).is_err());
        assert!(LeverageCalculator::compute_stop_loss(dec!(50000), dec!(-1)).is_err());

        // Anything under 100% stays strictly below entry and above zero
        let stop = LeverageCalculator::compute_stop_loss(dec!(50000), dec!(99.99)).unwrap();
        assert!(stop > Decimal::ZERO && stop < dec!(50000));
    }

    #[test]
    fn test_take_profit() {
        assert_eq!(
            LeverageCalculator::compute_take_profit(dec!(50000), dec!(10)).unwrap(),
            dec!(55000)
        );
        assert_eq!(
            LeverageCalculator::compute_take_profit(dec!(40000), dec!(20)).unwrap(),
            dec!(48000)
        );
        assert_eq!(
            LeverageCalculator::compute_take_profit(dec!(40000), Decimal::ZERO).unwrap(),
            dec!(40000)
        );
        assert!(LeverageCalculator::compute_take_profit(dec!(40000), dec!(-0.5)).is_err());
    }

    #[test]
    fn test_risk_reward() {
        assert_eq!(
            LeverageCalculator::compute_risk_reward(dec!(50000), dec!(47500), dec!(55000)),
            dec!(2)
        );
        assert_eq!(
            LeverageCalculator::compute_risk_reward(dec!(10000), dec!(9500), dec!(10500)),
            dec!(1)
        );
    }

    #[test]
    fn test_risk_reward_without_downside_is_zero() {
        assert_eq!(
            LeverageCalculator::compute_risk_reward(dec!(50000), dec!(50000), dec!(55000)),
            Decimal::ZERO
        );
        assert_eq!(
            LeverageCalculator::compute_risk_reward(dec!(50000), dec!(51000), dec!(55000)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_risk_reward_extremes_do_not_panic() {
        assert_eq!(
            LeverageCalculator::compute_risk_reward(Decimal::MAX, Decimal::MIN, Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            LeverageCalculator::compute_risk_reward(Decimal::MIN, Decimal::ZERO, Decimal::MAX),
            Decimal::ZERO
        );
        // Tiny risk against a huge reward overflows the quotient
        assert_eq!(
            LeverageCalculator::compute_risk_reward(dec!(1), dec!(0.9999999999), Decimal::MAX),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_risk_reward_scale_invariant() {
        let base = LeverageCalculator::compute_risk_reward(dec!(200), dec!(190), dec!(230));
        for k in [dec!(0.001), dec!(3), dec!(7.5), dec!(1000)] {
            let scaled =
                LeverageCalculator::compute_risk_reward(dec!(200) * k, dec!(190) * k, dec!(230) * k);
            assert_close(scaled, base);
        }
    }

    #[test]
    fn test_evaluate_full_scenario() {
        let request =
            PositionRequest::new(dec!(45000), dec!(1000), 10, dec!(5), dec!(10)).unwrap();
        let result = LeverageCalculator::evaluate(&request).unwrap();

        assert_close(result.position_size, dec!(10000) / dec!(45000));
        assert_eq!(result.stop_loss_price, dec!(42750));
        assert_eq!(result.take_profit_price, dec!(49500));
        assert_eq!(result.risk_reward_ratio, dec!(2));
        assert!(result.stop_loss_price < request.entry_price);
        assert!(request.entry_price < result.take_profit_price);
    }

    #[test]
    fn test_evaluate_rejects_invalid_request() {
        let request = PositionRequest {
            entry_price: dec!(100),
            investment_amount: dec!(100),
            leverage: 10,
            stop_loss_percent: dec!(5),
            profit_target_percent: dec!(100),
        };
        let err = LeverageCalculator::evaluate(&request).unwrap_err();
        assert_eq!(err.field(), "profit_target_percent");
    }

    #[test]
    fn test_outcome_is_leveraged() {
        let request =
            PositionRequest::new(dec!(50000), dec!(25000), 10, dec!(5), dec!(10)).unwrap();
        let result = LeverageCalculator::evaluate(&request).unwrap();
        let outcome = LeverageCalculator::outcome(&request, &result);

        // 5 BTC * $2,500 drop, 5 BTC * $5,000 rise
        assert_eq!(outcome.loss_at_stop, dec!(12500));
        assert_eq!(outcome.profit_at_target, dec!(25000));
        assert_eq!(outcome.loss_return, dec!(0.5));
        assert_eq!(outcome.profit_return, dec!(1));
    }
}
