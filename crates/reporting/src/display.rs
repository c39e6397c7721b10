// In crates/reporting/src/display.rs

use core_types::{DerivedTrade, PortfolioSummary};
use serde::Serialize;

/// Placeholder shown for undefined (NaN) values.
pub const UNDEFINED: &str = "n/a";

/// One line of the position detail table, every value pre-formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub trade_id: i64,
    pub spread_name: String,
    pub entry_date: String,
    pub size: String,
    pub pnl_usd: String,
    pub pnl_pct: String,
    pub status: String,
    pub prox_profit_target_pct: String,
    pub prox_stop_loss_pct: String,
    pub prox_time_stop: String,
}

/// The three headline metrics of the portfolio summary, formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDisplay {
    pub total_pnl_usd: String,
    pub pct_capital_at_risk: String,
    pub trade_count: String,
}

/// Formats derived trades for display. No business logic happens here.
pub fn format_for_display(derived: &[DerivedTrade]) -> Vec<DisplayRow> {
    derived
        .iter()
        .map(|t| DisplayRow {
            trade_id: t.trade_id,
            spread_name: t.spread_name.clone(),
            entry_date: t.entry_date.format("%Y-%m-%d").to_string(),
            size: t.size.to_string(),
            pnl_usd: format_currency(t.pnl_usd),
            pnl_pct: format_pct(t.pnl_pct, 2),
            status: t.status.label().to_string(),
            prox_profit_target_pct: format_pct(t.prox_profit_target_pct, 0),
            prox_stop_loss_pct: format_pct(t.prox_stop_loss_pct, 0),
            prox_time_stop: format!("{} / {} days", t.days_open, t.time_stop_days),
        })
        .collect()
}

pub fn format_summary(summary: &PortfolioSummary) -> SummaryDisplay {
    SummaryDisplay {
        total_pnl_usd: format_currency(summary.total_pnl_usd),
        pct_capital_at_risk: format_pct(summary.pct_capital_at_risk, 2),
        trade_count: summary.trade_count.to_string(),
    }
}

/// `$` prefix, thousands separators, two decimals: `$12,500.00`, `$-1,800.00`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // Don't print a sign for values that round to zero.
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, group_thousands(whole), cents)
}

pub fn format_pct(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("{:.*}%", decimals, value)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
