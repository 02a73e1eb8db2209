use serde::{Deserialize, Serialize};

use super::{aggregate_balances, BalanceReport, LedgerEntry, Points};

/// Result of spending points against a ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendOutcome {
    /// Remaining points per payer after the spend
    pub balances: BalanceReport,
    /// Amount the caller asked to spend
    pub requested: Points,
    /// Amount actually deducted from the ledger
    pub spent: Points,
    /// Part of `requested` that could not be covered (0 on a full spend)
    pub shortfall: Points,
    /// Post-spend working copy, oldest entry first
    pub entries: Vec<LedgerEntry>,
}

impl SpendOutcome {
    pub fn is_shortfall(&self) -> bool {
        self.shortfall > 0
    }
}

/// Total points that can be spent from the given entries.
/// Zero and negative grants contribute nothing.
pub fn total_available(entries: &[LedgerEntry]) -> Result<Points, SpendError> {
    entries
        .iter()
        .map(LedgerEntry::available)
        .try_fold(0 as Points, |sum, points| sum.checked_add(points))
        .ok_or(SpendError::Overflow { payer: None })
}

/// Spend `amount` points across `entries`, oldest grant first.
///
/// The caller's entries are never modified: a working copy is sorted by
/// timestamp (stable, so equal timestamps keep their input order) and
/// drained front to back. No entry is ever taken below zero. When the
/// ledger cannot cover the whole amount, every positive entry ends at zero
/// and the uncovered part is reported as `shortfall`.
///
/// Fails with `Overflow` if a payer's remaining total does not fit in `Points`.
pub fn spend(entries: &[LedgerEntry], amount: Points) -> Result<SpendOutcome, SpendError> {
    if amount < 0 {
        return Err(SpendError::InvalidAmount { amount });
    }

    let mut working = entries.to_vec();
    working.sort_by_key(|entry| entry.timestamp);

    let mut remaining_to_spend = amount;
    for entry in working.iter_mut() {
        if remaining_to_spend == 0 {
            break;
        }

        let available = entry.points;
        if available <= 0 {
            continue;
        }

        if available <= remaining_to_spend {
            entry.points = 0;
            remaining_to_spend -= available;
        } else {
            entry.points = available - remaining_to_spend;
            remaining_to_spend = 0;
        }

        tracing::debug!(
            payer = %entry.payer,
            timestamp = %entry.timestamp,
            deducted = available - entry.points,
            left = entry.points,
            "deducted points from entry"
        );
    }

    let balances = aggregate_balances(&working)?;

    Ok(SpendOutcome {
        balances,
        requested: amount,
        spent: amount - remaining_to_spend,
        shortfall: remaining_to_spend,
        entries: working,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendError {
    InvalidAmount { amount: Points },
    /// A sum of points left the `Points` range. `payer` is set for per-payer totals.
    Overflow { payer: Option<String> },
}

impl std::fmt::Display for SpendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpendError::InvalidAmount { amount } => {
                write!(f, "Cannot spend {} points: amount must not be negative", amount)
            }
            SpendError::Overflow { payer: Some(payer) } => {
                write!(f, "Point total for payer '{}' is out of range", payer)
            }
            SpendError::Overflow { payer: None } => {
                write!(f, "Ledger point total is out of range")
            }
        }
    }
}

impl std::error::Error for SpendError {}
