// In crates/app-config/src/types.rs

use core_types::RawTrade;
use risk::RiskSettings;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    pub server: ServerSettings,
    #[serde(default)]
    pub portfolio: PortfolioSettings,
    /// Status bands, time stop and loss limit. Every key is optional.
    #[serde(default)]
    pub risk: RiskSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PortfolioSettings {
    /// Total account capital in USD, used when a request doesn't supply one.
    #[serde(default = "default_total_capital")]
    pub total_capital: f64,
    /// Path of the TOML snapshot that seeds the dashboard.
    #[serde(default)]
    pub trades_file: Option<String>,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            total_capital: default_total_capital(),
            trades_file: None,
        }
    }
}

// --- Structs for the portfolio snapshot file ---

/// A saved set of open trades, e.g. `config/portfolio.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct PortfolioSnapshot {
    /// Overrides `portfolio.total_capital` when present.
    #[serde(default)]
    pub total_capital: Option<f64>,
    #[serde(default, deserialize_with = "core_types::deserialize_rows")]
    pub trades: Vec<RawTrade>,
}

/// Helper functions for serde defaults
fn default_log_level() -> String { "info".to_string() }
fn default_total_capital() -> f64 { 200_000.0 }
