//! Errors raised by the calculator when an argument breaks a precondition.

use thiserror::Error;

/// Rejection of a calculator argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// A precondition on a formula's arguments was violated.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending argument.
    #[cfg(test)]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}
