// In crates/risk/src/types.rs

use crate::{Error, Result};
use core_types::Status;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HIGH_ALERT_THRESHOLD_PCT: f64 = 85.0;
pub const DEFAULT_WATCH_THRESHOLD_PCT: f64 = 60.0;
pub const DEFAULT_TIME_STOP_DAYS: i64 = 45;
pub const DEFAULT_MAX_DRAWDOWN_PER_TRADE_PCT: f64 = 0.02;

/// Tunables for the risk calculator. Every key may be omitted from the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSettings {
    /// Stop-loss proximity (percent) at or above which a trade is `HighAlert`.
    #[serde(default = "default_high_alert")]
    pub high_alert_threshold_pct: f64,
    /// Stop-loss proximity (percent) at or above which a trade is `Watch`.
    #[serde(default = "default_watch")]
    pub watch_threshold_pct: f64,
    /// Maximum holding period before a trade is flagged by the time stop.
    #[serde(default = "default_time_stop_days")]
    pub time_stop_days: i64,
    /// Largest acceptable loss on a single trade as a fraction of total capital.
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown_per_trade_pct: f64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            high_alert_threshold_pct: DEFAULT_HIGH_ALERT_THRESHOLD_PCT,
            watch_threshold_pct: DEFAULT_WATCH_THRESHOLD_PCT,
            time_stop_days: DEFAULT_TIME_STOP_DAYS,
            max_drawdown_per_trade_pct: DEFAULT_MAX_DRAWDOWN_PER_TRADE_PCT,
        }
    }
}

impl RiskSettings {
    /// Checks the settings are internally consistent.
    pub fn validate(&self) -> Result<()> {
        let bands_ok = self.watch_threshold_pct.is_finite()
            && self.high_alert_threshold_pct.is_finite()
            && 0.0 <= self.watch_threshold_pct
            && self.watch_threshold_pct <= self.high_alert_threshold_pct
            && self.high_alert_threshold_pct <= 100.0;
        if !bands_ok {
            return Err(Error::InvalidParameters(format!(
                "status thresholds must satisfy 0 <= watch ({}) <= high alert ({}) <= 100",
                self.watch_threshold_pct, self.high_alert_threshold_pct
            )));
        }
        if self.time_stop_days <= 0 {
            return Err(Error::InvalidParameters(format!(
                "time_stop_days must be positive, got {}",
                self.time_stop_days
            )));
        }
        if !(self.max_drawdown_per_trade_pct > 0.0 && self.max_drawdown_per_trade_pct <= 1.0) {
            return Err(Error::InvalidParameters(format!(
                "max_drawdown_per_trade_pct must be in (0, 1], got {}",
                self.max_drawdown_per_trade_pct
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> StatusThresholds {
        StatusThresholds {
            high_alert_pct: self.high_alert_threshold_pct,
            watch_pct: self.watch_threshold_pct,
        }
    }
}

/// The two lower bounds that split stop-loss proximity into three bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    pub high_alert_pct: f64,
    pub watch_pct: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            high_alert_pct: DEFAULT_HIGH_ALERT_THRESHOLD_PCT,
            watch_pct: DEFAULT_WATCH_THRESHOLD_PCT,
        }
    }
}

impl StatusThresholds {
    /// Lower bounds are inclusive. An undefined (NaN) proximity falls through to `Ok`.
    pub fn classify(&self, prox_stop_loss_pct: f64) -> Status {
        if prox_stop_loss_pct >= self.high_alert_pct {
            Status::HighAlert
        } else if prox_stop_loss_pct >= self.watch_pct {
            Status::Watch
        } else {
            Status::Ok
        }
    }
}

// Helper functions for serde defaults
fn default_high_alert() -> f64 { DEFAULT_HIGH_ALERT_THRESHOLD_PCT }
fn default_watch() -> f64 { DEFAULT_WATCH_THRESHOLD_PCT }
fn default_time_stop_days() -> i64 { DEFAULT_TIME_STOP_DAYS }
fn default_max_drawdown() -> f64 { DEFAULT_MAX_DRAWDOWN_PER_TRADE_PCT }
