// In crates/risk/src/calculator.rs

use crate::types::{RiskSettings, StatusThresholds};
use chrono::{DateTime, Utc};
use core_types::{DerivedTrade, Status, Trade};

/// Stop-loss placed symmetrically around entry: as far below entry as the target is above it.
pub fn stop_loss_price(entry_price: f64, profit_target_price: f64) -> f64 {
    entry_price - (profit_target_price - entry_price)
}

/// Division that yields NaN instead of an infinity when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Expresses a ratio as a percentage clamped to [0, 100]. NaN stays NaN.
fn proximity_pct(numerator: f64, denominator: f64) -> f64 {
    (ratio(numerator, denominator) * 100.0).clamp(0.0, 100.0)
}

/// Classifies stop-loss proximity with the default 85 / 60 bands.
pub fn classify_status(prox_stop_loss_pct: f64) -> Status {
    StatusThresholds::default().classify(prox_stop_loss_pct)
}

/// Computes every derived field for a single trade as of `now`.
pub fn enrich_trade(trade: &Trade, now: DateTime<Utc>, settings: &RiskSettings) -> DerivedTrade {
    let stop_loss_price = stop_loss_price(trade.entry_price, trade.profit_target_price);

    // --- P&L ---
    let pnl_per_lot = trade.current_price - trade.entry_price;
    let pnl_usd = pnl_per_lot * trade.size;
    let pnl_pct = ratio(pnl_usd, trade.entry_price * trade.size) * 100.0;

    // --- Threshold proximity ---
    let prox_profit_target_pct = proximity_pct(
        trade.current_price - trade.entry_price,
        trade.profit_target_price - trade.entry_price,
    );
    let prox_stop_loss_pct = proximity_pct(
        trade.entry_price - trade.current_price,
        trade.entry_price - stop_loss_price,
    );

    // --- Time in trade ---
    // Whole days elapsed since midnight of the entry date, rounded down.
    let days_open = (now.date_naive() - trade.entry_date).num_days();

    DerivedTrade {
        trade_id: trade.trade_id,
        spread_name: trade.spread_name.clone(),
        entry_date: trade.entry_date,
        size: trade.size,
        entry_price: trade.entry_price,
        current_price: trade.current_price,
        profit_target_price: trade.profit_target_price,
        stop_loss_price,
        pnl_per_lot,
        pnl_usd,
        pnl_pct,
        prox_profit_target_pct,
        prox_stop_loss_pct,
        days_open,
        time_stop_days: settings.time_stop_days,
        time_stop_reached: days_open >= settings.time_stop_days,
        status: settings.thresholds().classify(prox_stop_loss_pct),
    }
}

/// Enriches a whole snapshot with the default settings, preserving order.
pub fn enrich(trades: &[Trade], now: DateTime<Utc>) -> Vec<DerivedTrade> {
    let settings = RiskSettings::default();
    trades.iter().map(|t| enrich_trade(t, now, &settings)).collect()
}
