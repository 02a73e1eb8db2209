use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Points;

/// A single point grant from a payer.
/// Entries are immutable inputs; a spend works on its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Who granted the points (not unique across entries)
    pub payer: String,
    /// Points granted. Zero and negative values are carried through untouched.
    pub points: Points,
    /// When the grant happened; only used for ordering
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(payer: impl Into<String>, points: Points, timestamp: DateTime<Utc>) -> Self {
        Self {
            payer: payer.into(),
            points,
            timestamp,
        }
    }

    /// Points this entry can contribute to a spend.
    pub fn available(&self) -> Points {
        self.points.max(0)
    }
}
