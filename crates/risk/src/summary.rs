// In crates/risk/src/summary.rs

use crate::types::DEFAULT_MAX_DRAWDOWN_PER_TRADE_PCT;
use core_types::{DerivedTrade, PortfolioSummary, Status};

/// Aggregates a set of derived trades with the default per-trade loss limit.
pub fn summarize(derived: &[DerivedTrade], total_capital: f64) -> PortfolioSummary {
    summarize_with_limit(derived, total_capital, DEFAULT_MAX_DRAWDOWN_PER_TRADE_PCT)
}

/// Aggregates a set of derived trades.
///
/// `max_drawdown_per_trade_pct` is a fraction of capital (0.02 = 2%). When
/// `total_capital` is not a positive number the capital-based metrics are NaN.
pub fn summarize_with_limit(
    derived: &[DerivedTrade],
    total_capital: f64,
    max_drawdown_per_trade_pct: f64,
) -> PortfolioSummary {
    let capital_ok = total_capital.is_finite() && total_capital > 0.0;

    // 1. Net P&L
    let total_pnl_usd: f64 = derived.iter().map(|t| t.pnl_usd).sum();

    // 2. Capital at risk: only the open losses count.
    let open_losses: f64 = derived
        .iter()
        .map(|t| t.pnl_usd)
        .filter(|pnl| *pnl < 0.0)
        .sum();
    let pct_capital_at_risk = if capital_ok {
        open_losses.abs() / total_capital * 100.0
    } else {
        f64::NAN
    };

    // 3. Per-trade loss limit
    let (max_loss_per_trade_usd, over_loss_limit_count) = if capital_ok {
        let limit = total_capital * max_drawdown_per_trade_pct;
        let over = derived.iter().filter(|t| -t.pnl_usd > limit).count();
        (limit, over)
    } else {
        (f64::NAN, 0)
    };

    // 4. Status and time-stop counts
    let high_alert_count = derived.iter().filter(|t| t.status == Status::HighAlert).count();
    let watch_count = derived.iter().filter(|t| t.status == Status::Watch).count();
    let time_stop_count = derived.iter().filter(|t| t.time_stop_reached).count();

    PortfolioSummary {
        total_pnl_usd,
        pct_capital_at_risk,
        trade_count: derived.len(),
        total_capital,
        high_alert_count,
        watch_count,
        time_stop_count,
        max_loss_per_trade_usd,
        over_loss_limit_count,
    }
}
