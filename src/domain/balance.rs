use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LedgerEntry, Points, SpendError};

/// Remaining points per payer, ordered by payer name.
/// Every payer seen in the ledger has a key, even when its total is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceReport(BTreeMap<String, Points>);

impl BalanceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `points` to the payer's running total, creating the key if needed.
    /// Fails without touching the report if the total would leave the `i64` range.
    pub fn credit(&mut self, payer: &str, points: Points) -> Result<(), SpendError> {
        match self.0.get_mut(payer) {
            Some(total) => {
                *total = total
                    .checked_add(points)
                    .ok_or_else(|| SpendError::Overflow {
                        payer: Some(payer.to_string()),
                    })?;
            }
            None => {
                self.0.insert(payer.to_string(), points);
            }
        }
        Ok(())
    }

    pub fn get(&self, payer: &str) -> Option<Points> {
        self.0.get(payer).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum across all payers, or `None` if it does not fit in `Points`.
    pub fn total(&self) -> Option<Points> {
        self.0
            .values()
            .try_fold(0 as Points, |sum, points| sum.checked_add(*points))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Points)> {
        self.0.iter().map(|(payer, points)| (payer.as_str(), *points))
    }
}

/// Group entries by payer and sum their points, with no deduction applied.
pub fn aggregate_balances(entries: &[LedgerEntry]) -> Result<BalanceReport, SpendError> {
    let mut report = BalanceReport::new();
    for entry in entries {
        report.credit(&entry.payer, entry.points)?;
    }
    Ok(report)
}
