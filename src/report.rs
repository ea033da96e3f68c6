//! Human-readable report of an evaluated position, formulas included.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::{PositionRequest, PositionResult, ScenarioOutcome};
use crate::trading::{CalcError, LeverageCalculator};

/// A request together with everything computed from it.
#[derive(Debug, Clone, Serialize)]
pub struct PositionReport {
    /// Ticker of the asset, when known
    pub symbol: Option<String>,
    pub request: PositionRequest,
    pub result: PositionResult,
    pub outcome: ScenarioOutcome,
}

impl PositionReport {
    /// Evaluate `request` and bundle the results for display.
    pub fn build(symbol: Option<String>, request: PositionRequest) -> Result<Self, CalcError> {
        let result = LeverageCalculator::evaluate(&request)?;
        let outcome = LeverageCalculator::outcome(&request, &result);

        Ok(Self {
            symbol,
            request,
            result,
            outcome,
        })
    }

    fn unit(&self) -> &str {
        self.symbol.as_deref().unwrap_or("units")
    }

    /// Price move from entry to target, in percent.
    pub fn target_move_pct(&self) -> Decimal {
        (self.result.take_profit_price - self.request.entry_price) / self.request.entry_price
            * dec!(100)
    }
}

/// Format an amount with thousands separators and two decimals.
pub fn money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

impl fmt::Display for PositionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let req = &self.request;
        let res = &self.result;
        let out = &self.outcome;
        let sl_factor = Decimal::ONE - req.stop_loss_percent / dec!(100);
        let tp_factor = Decimal::ONE + req.profit_target_percent / dec!(100);

        writeln!(f, "\n{:=^70}", " CALCULATION RESULTS ")?;
        writeln!(f)?;
        writeln!(f, "--- Inputs ---")?;
        if let Some(symbol) = &self.symbol {
            writeln!(f, "Asset:                 {}", symbol)?;
        }
        writeln!(f, "Entry Price:           {}", money(req.entry_price))?;
        writeln!(f, "Investment:            {}", money(req.investment_amount))?;
        writeln!(f, "Stop Loss:             {:.2}%", req.stop_loss_percent.round_dp(2))?;
        writeln!(f, "Profit Target:         {:.2}%", req.profit_target_percent.round_dp(2))?;
        writeln!(f, "Leverage:              x{}", req.leverage)?;
        writeln!(f)?;
        writeln!(f, "--- Position ---")?;
        writeln!(f, "Formula: (Investment x Leverage) / Entry Price")?;
        writeln!(f, "Position Size:         {:.8} {}", res.position_size.round_dp(8), self.unit())?;
        writeln!(f, "Effective Capital:     {}", money(res.effective_capital))?;
        writeln!(f)?;
        writeln!(f, "--- Stop Loss ---")?;
        writeln!(f, "Formula: Entry Price x (1 - Stop Loss % / 100)")?;
        writeln!(
            f,
            "         {} x {:.4}",
            money(req.entry_price),
            sl_factor.round_dp(4)
        )?;
        writeln!(f, "Result:                {}", money(res.stop_loss_price))?;
        writeln!(f)?;
        writeln!(f, "--- Take Profit ---")?;
        writeln!(f, "Formula: Entry Price x (1 + Profit Target % / 100)")?;
        writeln!(
            f,
            "         {} x {:.4}",
            money(req.entry_price),
            tp_factor.round_dp(4)
        )?;
        writeln!(f, "Result:                {}", money(res.take_profit_price))?;
        writeln!(f, "Price Move:            {:.2}%", self.target_move_pct().round_dp(2))?;
        writeln!(f)?;
        writeln!(f, "--- Risk/Reward ---")?;
        writeln!(
            f,
            "Loss at Stop:          {} ({:.2}% of investment)",
            money(out.loss_at_stop),
            (out.loss_return * dec!(100)).round_dp(2)
        )?;
        writeln!(
            f,
            "Profit at Target:      {} ({:.2}% of investment)",
            money(out.profit_at_target),
            (out.profit_return * dec!(100)).round_dp(2)
        )?;
        writeln!(f, "Risk/Reward Ratio:     1:{:.2}", res.risk_reward_ratio.round_dp(2))?;
        if out.loss_return >= Decimal::ONE {
            writeln!(f, "Warning: the stop is beyond your full investment at this leverage")?;
        }
        writeln!(f, "{:=^70}", "")?;
        Ok(())
    }
}
