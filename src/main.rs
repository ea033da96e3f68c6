//! Leveraged Crypto Position Calculator
//!
//! Sizes a leveraged long position from a live or manual entry price and
//! shows its stop-loss, take-profit and risk/reward figures.

mod api;
mod input;
mod models;
mod report;
mod session;
mod trading;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal_macros::dec;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{assets, PriceClient, PriceSource};
use crate::input::{decimal_arg, Prompter};
use crate::models::PositionRequest;
use crate::report::{money, PositionReport};
use crate::trading::{CalculatorConfig, DEFAULT_PRICE_API_URL};

/// Leveraged crypto position calculator CLI.
#[derive(Parser)]
#[command(name = "levcalc")]
#[command(about = "Size leveraged crypto positions with stop-loss and take-profit targets", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "LEVCALC_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Base URL of the CoinGecko-compatible price API
    #[arg(long, global = true, env = "LEVCALC_API_URL", default_value = DEFAULT_PRICE_API_URL)]
    api_url: String,

    /// Leverage multiplier
    #[arg(long, global = true, env = "LEVCALC_LEVERAGE")]
    leverage: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one scenario from command-line arguments
    Calc {
        /// Investment amount in USD
        #[arg(short, long)]
        investment: f64,

        /// Stop loss percentage below entry (0-100)
        #[arg(short, long)]
        stop_loss: Option<f64>,

        /// Profit target percentage above entry (0-100)
        #[arg(short, long)]
        take_profit: Option<f64>,

        /// Asset symbol to price live (e.g., BTC)
        #[arg(long, conflicts_with = "price")]
        symbol: Option<String>,

        /// Entry price in USD, skips the live lookup
        #[arg(short, long, required_unless_present = "symbol")]
        price: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prompt for asset, amount and percentages
    Interactive,

    /// Run the sample scenario ($50,000 entry, $25,000 invested, 5% stop, 10% target)
    Demo,

    /// Fetch the live USD price of an asset
    Price {
        /// Asset symbol (e.g., ETH)
        symbol: String,
    },

    /// List supported asset symbols
    Assets,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = CalculatorConfig {
        price_api_url: cli.api_url.clone(),
        ..Default::default()
    };
    if let Some(leverage) = cli.leverage {
        config.default_leverage = leverage;
    }
    config.validate()?;

    match cli.command {
        Commands::Calc {
            investment,
            stop_loss,
            take_profit,
            symbol,
            price,
            json,
        } => {
            let (symbol, entry_price) = match (symbol, price) {
                (_, Some(p)) => (None, decimal_arg(p, "entry_price")?),
                (Some(s), None) => {
                    let asset = assets::lookup(&s)?;
                    let client = PriceClient::from_config(&config)?;
                    let quote = client.get_price(asset).await?;
                    (Some(quote.symbol), quote.price)
                }
                (None, None) => anyhow::bail!("Either --symbol or --price is required"),
            };

            let stop_loss_percent = match stop_loss {
                Some(s) => decimal_arg(s, "stop_loss_percent")?,
                None => config.default_stop_loss_pct,
            };
            let profit_target_percent = match take_profit {
                Some(t) => decimal_arg(t, "profit_target_percent")?,
                None => config.default_profit_target_pct,
            };

            let request = PositionRequest::new(
                entry_price,
                decimal_arg(investment, "investment_amount")?,
                config.default_leverage,
                stop_loss_percent,
                profit_target_percent,
            )?;

            info!(
                entry = %request.entry_price,
                investment = %request.investment_amount,
                leverage = request.leverage,
                "Evaluating scenario"
            );

            let report = PositionReport::build(symbol, request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }

        Commands::Interactive => {
            let client = PriceClient::from_config(&config)?;
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());

            let report =
                session::run_interactive(&mut prompter, &client, config.default_leverage).await?;
            println!("{}", report);
        }

        Commands::Demo => {
            let request = PositionRequest::new(
                dec!(50000),
                dec!(25000),
                config.default_leverage,
                dec!(5),
                dec!(10),
            )?;

            println!("\n=== Demo Scenario ===");
            println!("Sample inputs, no live price lookup.");
            println!("{}", PositionReport::build(Some("BTC".to_string()), request)?);
        }

        Commands::Price { symbol } => {
            let asset = assets::lookup(&symbol)?;
            let client = PriceClient::from_config(&config)?;
            let quote = client.get_price(asset).await?;

            println!(
                "{} ({}): {} at {}",
                quote.symbol,
                quote.asset_id,
                money(quote.price),
                quote.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }

        Commands::Assets => {
            println!("\n{:<8} {:<20}", "SYMBOL", "COINGECKO ID");
            println!("{}", "-".repeat(28));
            for asset in assets::ASSETS {
                println!("{:<8} {:<20}", asset.symbol, asset.id);
            }
        }

        Commands::Config => {
            println!("\n=== Calculator Configuration ===\n");
            println!("Scenario Defaults:");
            println!("  Leverage:             x{}", config.default_leverage);
            println!("  Stop Loss:            {}%", config.default_stop_loss_pct);
            println!("  Profit Target:        {}%", config.default_profit_target_pct);

            println!("\nPrice Source:");
            println!("  API URL:              {}", config.price_api_url);
            println!("  Request Timeout:      {}s", config.request_timeout_secs);
            println!("  Retry Budget:         {}s", config.retry_budget_secs);
        }
    }

    Ok(())
}
