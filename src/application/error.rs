use thiserror::Error;

use crate::domain::{ParsePointsError, Points, SpendError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Malformed ledger at line {line}{}: {message}", field_suffix(.field))]
    MalformedLedger {
        line: usize,
        field: Option<String>,
        message: String,
    },

    #[error("Insufficient points: requested {requested}, only {spent} available ({shortfall} unspent)")]
    Shortfall {
        requested: Points,
        spent: Points,
        shortfall: Points,
    },

    #[error("Ledger totals out of range: {0}")]
    LedgerOverflow(String),

    #[error("Cannot read ledger: {0}")]
    Io(#[from] std::io::Error),
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" (field '{}')", f))
        .unwrap_or_default()
}

impl From<ParsePointsError> for AppError {
    fn from(err: ParsePointsError) -> Self {
        AppError::InvalidAmount(err.to_string())
    }
}

impl From<SpendError> for AppError {
    fn from(err: SpendError) -> Self {
        match err {
            SpendError::InvalidAmount { .. } => AppError::InvalidAmount(err.to_string()),
            SpendError::Overflow { .. } => AppError::LedgerOverflow(err.to_string()),
        }
    }
}
