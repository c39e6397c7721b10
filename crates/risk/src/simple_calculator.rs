// In crates/risk/src/simple_calculator.rs

use crate::calculator::enrich_trade;
use crate::summary::summarize_with_limit;
use crate::types::RiskSettings;
use crate::{Result, RiskCalculator};
use chrono::{DateTime, Utc};
use core_types::{DerivedTrade, PortfolioSummary, Trade};

/// A risk calculator that places the stop-loss symmetrically around entry.
///
/// Status bands, the time stop and the per-trade loss limit all come from
/// its `RiskSettings`.
#[derive(Debug, Clone)]
pub struct SimpleRiskCalculator {
    settings: RiskSettings,
}

impl SimpleRiskCalculator {
    /// Creates a new calculator, rejecting inconsistent settings.
    pub fn new(settings: RiskSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }
}

impl Default for SimpleRiskCalculator {
    fn default() -> Self {
        Self { settings: RiskSettings::default() }
    }
}

impl RiskCalculator for SimpleRiskCalculator {
    fn name(&self) -> &'static str {
        "SimpleRiskCalculator"
    }

    fn enrich(&self, trades: &[Trade], now: DateTime<Utc>) -> Vec<DerivedTrade> {
        trades
            .iter()
            .map(|trade| {
                let derived = enrich_trade(trade, now, &self.settings);
                tracing::debug!(
                    trade_id = derived.trade_id,
                    pnl_usd = derived.pnl_usd,
                    prox_stop_loss_pct = derived.prox_stop_loss_pct,
                    status = %derived.status,
                    "Enriched trade"
                );
                derived
            })
            .collect()
    }

    fn summarize(&self, derived: &[DerivedTrade], total_capital: f64) -> PortfolioSummary {
        summarize_with_limit(derived, total_capital, self.settings.max_drawdown_per_trade_pct)
    }
}
