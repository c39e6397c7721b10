// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::{PortfolioSnapshot, Settings};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use core_types::Trade;
use risk::{RiskCalculator, SimpleRiskCalculator};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use web_server::AppState;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Risk dashboard for open spread trades.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serves the interactive dashboard and its JSON/CSV API.
    Serve,

    /// Evaluates a portfolio and prints the summary and position detail.
    Evaluate {
        /// A trade CSV to evaluate instead of the configured portfolio file.
        #[arg(short, long)]
        trades: Option<PathBuf>,

        /// Total capital in USD. Overrides the portfolio file and settings.
        #[arg(short, long)]
        capital: Option<f64>,

        /// Evaluate as of this date (YYYY-MM-DD, midnight UTC) instead of now.
        #[arg(long)]
        as_of: Option<String>,

        /// Also write the full numeric results to this CSV file.
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Writes the configured portfolio as a trade CSV to start editing from.
    Template {
        #[arg(short, long, default_value = "trades.csv")]
        output: PathBuf,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings().context("Failed to load settings from config/")?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting spread risk dashboard");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Serve => {
            handle_serve(settings).await?;
        }
        Commands::Evaluate {
            trades,
            capital,
            as_of,
            export,
        } => {
            handle_evaluate(&settings, trades, capital, as_of, export)?;
        }
        Commands::Template { output } => {
            handle_template(&settings, output)?;
        }
    }

    Ok(())
}

/// Installs the console subscriber at the configured level.
fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN) // Connection-level noise
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Loads the portfolio snapshot named in the settings, or an empty one.
fn load_snapshot(settings: &Settings) -> Result<PortfolioSnapshot> {
    match settings.portfolio.trades_file.as_deref() {
        Some(path) => {
            let snapshot = app_config::load_portfolio(path)
                .with_context(|| format!("Failed to load portfolio file {}", path))?;
            tracing::info!(path, trades = snapshot.trades.len(), "Loaded portfolio snapshot");
            Ok(snapshot)
        }
        None => {
            tracing::info!("No portfolio file configured. Starting with an empty table.");
            Ok(PortfolioSnapshot::default())
        }
    }
}

// --- "Serve" Subcommand Logic ---

async fn handle_serve(settings: Settings) -> Result<()> {
    let snapshot = load_snapshot(&settings)?;
    let calculator = SimpleRiskCalculator::new(settings.risk.clone())?;
    let state = AppState::new(calculator, settings.portfolio.total_capital, snapshot);

    web_server::run(settings.server, state).await?;
    Ok(())
}

// --- "Evaluate" Subcommand Logic ---

fn handle_evaluate(
    settings: &Settings,
    trades: Option<PathBuf>,
    capital: Option<f64>,
    as_of: Option<String>,
    export: Option<PathBuf>,
) -> Result<()> {
    // --- 1. Load the trades ---
    let (rows, snapshot_capital) = match trades {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open trade file {}", path.display()))?;
            (reporting::read_trades(file)?, None)
        }
        None => {
            let snapshot = load_snapshot(settings)?;
            (snapshot.trades, snapshot.total_capital)
        }
    };
    let total_capital = capital
        .or(snapshot_capital)
        .unwrap_or(settings.portfolio.total_capital);

    let now = match as_of {
        Some(date) => parse_as_of(&date)?,
        None => Utc::now(),
    };

    // --- 2. Evaluate ---
    let calculator = SimpleRiskCalculator::new(settings.risk.clone())?;
    let evaluation = calculator.evaluate(&rows, total_capital, now);

    // --- 3. Report ---
    let display = reporting::format_for_display(&evaluation.trades);
    let summary = reporting::format_summary(&evaluation.summary);
    println!("\nAs of {}", evaluation.as_of.format("%Y-%m-%d %H:%M UTC"));
    println!("{}", reporting::render_table(&display, &summary));
    if !evaluation.is_clean() {
        println!("Problems:");
        for error in evaluation.rejected.iter().chain(&evaluation.warnings) {
            println!("  ! {}", error);
        }
    }

    if let Some(path) = export {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create export file {}", path.display()))?;
        reporting::write_export(file, &evaluation.trades)?;
        tracing::info!(path = %path.display(), rows = evaluation.trades.len(), "Export written");
    }

    Ok(())
}

/// Parses a `YYYY-MM-DD` date as midnight UTC.
fn parse_as_of(date_str: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(&format!("{} 00:00:00", date_str), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| anyhow::anyhow!("Failed to parse as-of date: {}", e))?;
    Ok(Utc.from_utc_datetime(&naive))
}

// --- "Template" Subcommand Logic ---

fn handle_template(settings: &Settings, output: PathBuf) -> Result<()> {
    let snapshot = load_snapshot(settings)?;

    let mut trades: Vec<Trade> = Vec::with_capacity(snapshot.trades.len());
    for (row, raw) in snapshot.trades.iter().enumerate() {
        match Trade::from_raw(row, raw) {
            Ok(trade) => trades.push(trade),
            Err(error) => tracing::warn!(%error, "Skipping invalid row in portfolio file"),
        }
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    reporting::write_trades(file, &trades)?;
    tracing::info!(path = %output.display(), rows = trades.len(), "Trade template written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_of_is_midnight_utc() {
        let dt = parse_as_of("2025-10-18").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 18, 0, 0, 0).unwrap());
        assert!(parse_as_of("18/10/2025").is_err());
    }

    #[test]
    fn cli_parses_evaluate_flags() {
        let cli = Cli::try_parse_from([
            "spread-risk", "evaluate", "--trades", "open.csv", "--capital", "150000",
            "--as-of", "2025-10-18", "--export", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Evaluate { trades, capital, as_of, export } => {
                assert_eq!(trades, Some(PathBuf::from("open.csv")));
                assert_eq!(capital, Some(150_000.0));
                assert_eq!(as_of.as_deref(), Some("2025-10-18"));
                assert_eq!(export, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
