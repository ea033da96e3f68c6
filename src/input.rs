//! Console input: parsing user-typed numbers and re-prompting until they validate.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::trading::{check_percent, CalcError};

/// Parse a strictly positive number typed by the user.
pub fn parse_positive(text: &str, name: &'static str) -> Result<Decimal, CalcError> {
    let cleaned = text.trim().trim_start_matches('$').replace(',', "");
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| CalcError::invalid(name, format!("'{}' is not a number", text.trim())))?;

    if value <= Decimal::ZERO {
        return Err(CalcError::invalid(name, "must be positive"));
    }
    Ok(value)
}

/// Parse a positive percentage below 100.
pub fn parse_percent(text: &str, name: &'static str) -> Result<Decimal, CalcError> {
    let value = parse_positive(text.trim().trim_end_matches('%'), name)?;
    check_percent(name, value)?;
    Ok(value)
}

/// Convert a CLI float into a decimal amount.
pub fn decimal_arg(value: f64, name: &'static str) -> Result<Decimal, CalcError> {
    Decimal::try_from(value)
        .map_err(|_| CalcError::invalid(name, format!("{} is not representable", value)))
}

/// Line-oriented prompt loop over any reader/writer pair.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print a line of output.
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message).context("Failed to write output")
    }

    /// Ask once and return the trimmed answer. End of input is an error.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}", prompt).context("Failed to write prompt")?;
        self.writer.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed, calculation cancelled");
        }

        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer.
    pub fn ask_until<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, CalcError>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => self.say(&format!("{}. Please try again.\n", e))?,
            }
        }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}
