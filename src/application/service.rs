use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::domain::{spend, LedgerEntry, Points, SpendOutcome};
use crate::io::import::read_ledger_csv;

use super::AppError;

/// Application service running spends against one loaded ledger snapshot.
/// This is the primary interface for any client (CLI, tests, embedding code).
///
/// The snapshot is never modified: every spend computes a fresh outcome,
/// so repeated calls against the same service are independent.
#[derive(Debug, Clone, Default)]
pub struct PointsService {
    entries: Vec<LedgerEntry>,
}

impl PointsService {
    /// Create a service over already-parsed entries.
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Load a ledger from CSV.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        Ok(Self::new(read_ledger_csv(reader)?))
    }

    /// Load a ledger from a CSV file, or from stdin when `path` is `-`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        if path == Path::new("-") {
            tracing::debug!("reading ledger from stdin");
            return Self::from_reader(io::stdin().lock());
        }

        tracing::debug!(path = %path.display(), "reading ledger file");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    // ========================
    // Spend operations
    // ========================

    /// Spend `amount` points, oldest grants first.
    /// A shortfall is not an error here; inspect `SpendOutcome::shortfall`.
    pub fn spend(&self, amount: Points) -> Result<SpendOutcome, AppError> {
        let outcome = spend(&self.entries, amount)?;

        if outcome.is_shortfall() {
            tracing::info!(
                requested = outcome.requested,
                spent = outcome.spent,
                shortfall = outcome.shortfall,
                "ledger cannot cover the full amount"
            );
        } else {
            tracing::info!(
                spent = outcome.spent,
                payers = outcome.balances.len(),
                "spend complete"
            );
        }
        Ok(outcome)
    }
}

/// Turn a shortfall into an error, for callers that require the full amount to be spent.
pub fn require_full_spend(outcome: &SpendOutcome) -> Result<(), AppError> {
    if outcome.is_shortfall() {
        return Err(AppError::Shortfall {
            requested: outcome.requested,
            spent: outcome.spent,
            shortfall: outcome.shortfall,
        });
    }
    Ok(())
}
