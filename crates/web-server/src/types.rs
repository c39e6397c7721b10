// In crates/web-server/src/types.rs

use chrono::{DateTime, Utc};
use core_types::{DerivedTrade, PortfolioSummary, RawTrade};
use reporting::{DisplayRow, SummaryDisplay};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/evaluate` and `POST /api/export`.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct EvaluateRequest {
    /// Falls back to the configured capital when omitted.
    #[serde(default)]
    pub total_capital: Option<f64>,
    /// Rows as typed into the table. Odd cells are rejected per row later on.
    #[serde(default, deserialize_with = "core_types::deserialize_rows")]
    pub trades: Vec<RawTrade>,
    /// Evaluate as of this instant instead of now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Numeric and formatted results of one evaluation.
///
/// Undefined (NaN) numbers serialize as `null`.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub as_of: DateTime<Utc>,
    pub total_capital: f64,
    pub trades: Vec<DerivedTrade>,
    pub display: Vec<DisplayRow>,
    pub summary: PortfolioSummary,
    pub summary_display: SummaryDisplay,
    pub rejected: Vec<String>,
    pub warnings: Vec<String>,
}

/// The snapshot the dashboard starts from.
#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub total_capital: f64,
    pub trades: Vec<RawTrade>,
}
