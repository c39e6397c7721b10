// In crates/risk/src/evaluation.rs

use chrono::{DateTime, Utc};
use core_types::{DerivedTrade, Error, PortfolioSummary};

/// The complete result of evaluating one portfolio snapshot.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The instant every time-based field was computed against.
    pub as_of: DateTime<Utc>,
    /// Rows that parsed, in input order.
    pub trades: Vec<DerivedTrade>,
    pub summary: PortfolioSummary,
    /// One `Error::Parse` per row that was dropped.
    pub rejected: Vec<Error>,
    /// Field-level `DivisionUndefined` and capital `Configuration` problems.
    pub warnings: Vec<Error>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.warnings.is_empty()
    }
}
