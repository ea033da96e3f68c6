//! Interactive scenario: pick an asset, fetch its price, ask for the rest.

use std::io::{BufRead, Write};

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::api::{assets, PriceSource};
use crate::input::{parse_percent, parse_positive, Prompter};
use crate::models::PositionRequest;
use crate::report::{money, PositionReport};

/// Drive one interactive calculation and return its report.
pub async fn run_interactive<R, W, S>(
    prompter: &mut Prompter<R, W>,
    prices: &S,
    leverage: u32,
) -> Result<PositionReport>
where
    R: BufRead,
    W: Write,
    S: PriceSource,
{
    prompter.say(&format!("\n{:=^60}", format!(" CRYPTO LEVERAGE CALCULATOR (x{}) ", leverage)))?;
    prompter.say(&format!(
        "\nAvailable assets: {}\n",
        assets::available_symbols().join(", ")
    ))?;

    let (symbol, entry_price) = select_asset(prompter, prices).await?;

    let investment_amount = prompter.ask_until(
        "Enter investment amount in USD (e.g., 10000): ",
        |s| parse_positive(s, "investment amount"),
    )?;
    let stop_loss_percent = prompter.ask_until(
        "Enter stop loss percentage (e.g., 5): ",
        |s| parse_percent(s, "stop loss percentage"),
    )?;
    let profit_target_percent = prompter.ask_until(
        "Enter target profit percentage (e.g., 10): ",
        |s| parse_percent(s, "target profit percentage"),
    )?;

    let request = PositionRequest::new(
        entry_price,
        investment_amount,
        leverage,
        stop_loss_percent,
        profit_target_percent,
    )?;

    Ok(PositionReport::build(Some(symbol), request)?)
}

/// Ask for a symbol until one resolves, then price it.
///
/// Unknown symbols re-prompt. A failed fetch for a known symbol falls
/// back to a manually entered price.
async fn select_asset<R, W, S>(
    prompter: &mut Prompter<R, W>,
    prices: &S,
) -> Result<(String, Decimal)>
where
    R: BufRead,
    W: Write,
    S: PriceSource,
{
    loop {
        let answer = prompter.ask("Enter asset symbol (e.g., BTC): ")?;
        if answer.is_empty() {
            prompter.say("Please enter a symbol.\n")?;
            continue;
        }

        let asset = match assets::lookup(&answer) {
            Ok(asset) => asset,
            Err(e) => {
                prompter.say(&format!("{}\n", e))?;
                continue;
            }
        };

        prompter.say(&format!("Fetching price for {}...", asset.symbol))?;
        match prices.get_price(asset).await {
            Ok(quote) => {
                info!(symbol = asset.symbol, price = %quote.price, "Using live price");
                prompter.say(&format!("{}: {}\n", asset.id.to_uppercase(), money(quote.price)))?;
                return Ok((asset.symbol.to_string(), quote.price));
            }
            Err(e) => {
                warn!(symbol = asset.symbol, error = %e, "Price fetch failed, asking for manual price");
                prompter.say(&format!("{:#}\nSwitching to manual price input.\n", e))?;

                let price = prompter.ask_until(
                    &format!("Enter {} price in USD: $", asset.symbol),
                    |s| parse_positive(s, "price"),
                )?;
                return Ok((asset.symbol.to_string(), price));
            }
        }
    }
}
