// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{PortfolioSnapshot, Settings};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Same as [`load_settings`], reading the TOML files from `dir`.
pub fn load_settings_from(dir: &str) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name(&format!("{}/base", dir)))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&format!("{}/{}", dir, environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP__PORTFOLIO__TOTAL_CAPITAL=...`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.risk.validate()?;

    Ok(settings)
}

/// Loads a portfolio snapshot (a `[[trades]]` table array) from a TOML file.
pub fn load_portfolio(path: impl AsRef<Path>) -> Result<PortfolioSnapshot> {
    let content = std::fs::read_to_string(path)?;
    parse_portfolio(&content)
}

/// Parses a portfolio snapshot from TOML text.
///
/// Native TOML dates and datetimes in a row are read as their text form, so
/// `entry_date = 2025-09-15` works as well as the quoted spelling. Cells of
/// any other odd type reject only their own row during evaluation.
pub fn parse_portfolio(content: &str) -> Result<PortfolioSnapshot> {
    let mut document: toml::Table = content.parse()?;

    if let Some(toml::Value::Array(rows)) = document.get_mut("trades") {
        for row in rows.iter_mut() {
            if let toml::Value::Table(cells) = row {
                for (_, cell) in cells.iter_mut() {
                    if let toml::Value::Datetime(datetime) = cell {
                        *cell = toml::Value::String(datetime.to_string());
                    }
                }
            }
        }
    }

    let snapshot: PortfolioSnapshot = toml::Value::Table(document).try_into()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CellValue, Trade};

    #[test]
    fn settings_fill_in_defaults() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [app]
                environment = "test"

                [server]
                host = "127.0.0.1"
                port = 8080

                [risk]
                time_stop_days = 30
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.portfolio.total_capital, 200_000.0);
        assert!(settings.portfolio.trades_file.is_none());
        assert_eq!(settings.risk.time_stop_days, 30);
        assert_eq!(settings.risk.high_alert_threshold_pct, 85.0);
        assert_eq!(settings.risk.watch_threshold_pct, 60.0);
        assert_eq!(settings.risk.max_drawdown_per_trade_pct, 0.02);
    }

    #[test]
    fn parses_a_portfolio_snapshot() {
        let snapshot = parse_portfolio(
            r#"
            total_capital = 150000.0

            [[trades]]
            trade_id = 1
            spread_name = "CAPI/PANA Q4"
            entry_date = "2025-09-15"
            size = 8
            entry_price = 5000
            current_price = 6562.5
            profit_target_price = 6800

            [[trades]]
            trade_id = 2
            spread_name = "PANA/SUPRA Q1"
            entry_date = "2025-10-01"
            size = "four"
            "#,
        )
        .unwrap();

        assert_eq!(snapshot.total_capital, Some(150_000.0));
        assert_eq!(snapshot.trades.len(), 2);
        assert_eq!(snapshot.trades[0].current_price, Some(CellValue::Float(6562.5)));
        assert_eq!(Trade::from_raw(0, &snapshot.trades[0]).unwrap().size, 8.0);
        // Bad rows load fine and are rejected later, during evaluation.
        assert_eq!(snapshot.trades[1].size, Some(CellValue::Text("four".to_string())));
        assert!(snapshot.trades[1].entry_price.is_none());
    }

    #[test]
    fn bundled_portfolio_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/portfolio.toml");
        let snapshot = load_portfolio(path).unwrap();
        assert_eq!(snapshot.trades.len(), 3);
        for (row, raw) in snapshot.trades.iter().enumerate() {
            assert!(Trade::from_raw(row, raw).is_ok());
        }
    }

    #[test]
    fn native_toml_dates_and_odd_cells_load() {
        let snapshot = parse_portfolio(
            r#"
            [[trades]]
            trade_id = 1
            spread_name = "CAPI/PANA Q4"
            entry_date = 2025-09-15
            size = 8
            entry_price = 5000
            current_price = 6562.5
            profit_target_price = 6800

            [[trades]]
            trade_id = 2
            spread_name = "PANA/SUPRA Q1"
            entry_date = 2025-10-01T09:00:00Z
            size = true
            entry_price = 3000
            current_price = 2550
            profit_target_price = 4000
            "#,
        )
        .unwrap();

        assert_eq!(snapshot.trades[0].entry_date, Some(CellValue::Text("2025-09-15".to_string())));
        let trade = Trade::from_raw(0, &snapshot.trades[0]).unwrap();
        assert_eq!(trade.entry_date.to_string(), "2025-09-15");

        assert_eq!(snapshot.trades[1].size, Some(CellValue::Unsupported("true".to_string())));
        let (trades, rejected) = core_types::parse::parse_rows(&snapshot.trades);
        assert_eq!(trades.len(), 1);
        assert!(matches!(
            rejected[..],
            [core_types::Error::Parse { row: 1, field: "size", .. }]
        ));
    }
}
