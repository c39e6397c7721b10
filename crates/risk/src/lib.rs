// In crates/risk/src/lib.rs

use chrono::{DateTime, Utc};
use core_types::{DerivedTrade, PortfolioSummary, RawTrade, Trade};

pub mod calculator;
pub mod error;
pub mod evaluation;
pub mod simple_calculator;
pub mod summary;
pub mod types;

// Re-export public types
pub use calculator::{classify_status, enrich, stop_loss_price};
pub use error::{Error, Result};
pub use evaluation::Evaluation;
pub use simple_calculator::SimpleRiskCalculator;
pub use summary::summarize;
pub use types::{RiskSettings, StatusThresholds};

/// The universal interface for a portfolio risk calculator.
///
/// A `RiskCalculator` turns a snapshot of open trades into derived per-trade
/// metrics and a portfolio summary. Every operation is a pure function of its
/// arguments: the same trades, capital and `now` always give the same output.
pub trait RiskCalculator: Sync {
    /// The name of the risk model.
    fn name(&self) -> &'static str;

    /// Computes the derived fields of every trade, preserving input order.
    fn enrich(&self, trades: &[Trade], now: DateTime<Utc>) -> Vec<DerivedTrade>;

    /// Aggregates derived trades into portfolio metrics.
    fn summarize(&self, derived: &[DerivedTrade], total_capital: f64) -> PortfolioSummary;

    /// Evaluates an untyped snapshot end to end.
    ///
    /// # Arguments
    ///
    /// * `rows`: The trade table as entered, one `RawTrade` per row.
    /// * `total_capital`: Account capital used for the capital-at-risk metrics.
    /// * `now`: The evaluation instant used for `days_open`.
    ///
    /// # Returns
    ///
    /// An `Evaluation`. Rows that fail to parse are dropped and reported in
    /// `rejected`; undefined ratios and a non-positive capital are reported in
    /// `warnings`. Nothing here aborts the evaluation.
    fn evaluate(&self, rows: &[RawTrade], total_capital: f64, now: DateTime<Utc>) -> Evaluation {
        let (trades, rejected) = core_types::parse::parse_rows(rows);
        for error in &rejected {
            tracing::warn!(%error, "Rejected trade row");
        }

        let derived = self.enrich(&trades, now);
        let summary = self.summarize(&derived, total_capital);

        let mut warnings = Vec::new();
        for trade in &derived {
            for field in trade.undefined_fields() {
                tracing::warn!(trade_id = trade.trade_id, field, "Derived field is undefined");
                warnings.push(core_types::Error::DivisionUndefined {
                    trade_id: trade.trade_id,
                    field,
                });
            }
        }
        if !(total_capital.is_finite() && total_capital > 0.0) {
            tracing::warn!(total_capital, "Total capital is not positive; capital at risk is undefined");
            warnings.push(core_types::Error::Configuration(format!(
                "total capital must be positive, got {}",
                total_capital
            )));
        }

        tracing::info!(
            calculator = self.name(),
            trade_count = summary.trade_count,
            rejected = rejected.len(),
            total_pnl_usd = summary.total_pnl_usd,
            "Portfolio evaluated"
        );

        Evaluation {
            as_of: now,
            trades: derived,
            summary,
            rejected,
            warnings,
        }
    }
}
