//! Data models for position scenarios and price quotes.

mod position;
mod quote;

pub use position::{PositionRequest, PositionResult, PositionSizing, ScenarioOutcome};
pub use quote::PriceQuote;
