// In crates/reporting/src/export.rs

use crate::{Error, Result};
use core_types::DerivedTrade;
use std::io;

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "risk_dashboard.csv";

/// Header row of the export. Matches the field names of `DerivedTrade`.
pub const EXPORT_COLUMNS: [&str; 17] = [
    "trade_id",
    "spread_name",
    "entry_date",
    "size",
    "entry_price",
    "current_price",
    "profit_target_price",
    "stop_loss_price",
    "pnl_per_lot",
    "pnl_usd",
    "pnl_pct",
    "prox_profit_target_pct",
    "prox_stop_loss_pct",
    "days_open",
    "time_stop_days",
    "time_stop_reached",
    "status",
];

/// Writes one CSV row per trade with every numeric field unformatted.
///
/// The header is always written, even for an empty portfolio. Floats use
/// their shortest round-trip representation; undefined values are `NaN`.
pub fn write_export<W: io::Write>(writer: W, trades: &[DerivedTrade]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(EXPORT_COLUMNS)?;
    for trade in trades {
        wtr.serialize(trade)?;
    }
    wtr.flush()?;
    tracing::debug!(rows = trades.len(), "Wrote CSV export");
    Ok(())
}

/// Renders the export into a UTF-8 string (no BOM).
pub fn export_to_string(trades: &[DerivedTrade]) -> Result<String> {
    let mut buffer = Vec::new();
    write_export(&mut buffer, trades)?;
    Ok(String::from_utf8(buffer)?)
}

/// Parses an export produced by `write_export` back into derived trades.
pub fn read_export<R: io::Read>(reader: R) -> Result<Vec<DerivedTrade>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize()
        .map(|record| record.map_err(Error::from))
        .collect()
}
