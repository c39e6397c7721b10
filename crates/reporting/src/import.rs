// In crates/reporting/src/import.rs

use crate::{Error, Result};
use core_types::{CellValue, RawTrade, Trade};
use std::io;

/// Columns a trade input file must carry. Extra columns are ignored, so an
/// export can be fed straight back in as input.
pub const INPUT_COLUMNS: [&str; 7] = [
    "trade_id",
    "spread_name",
    "entry_date",
    "size",
    "entry_price",
    "current_price",
    "profit_target_price",
];

/// Reads a header-driven CSV of open trades into untyped rows.
///
/// Cells are kept as text and validated later by the risk calculator, so a
/// malformed value rejects only its own row. Blank cells become `None`, and
/// a cell that isn't valid UTF-8 becomes `CellValue::Unsupported`. Only an
/// I/O failure or a broken header line fails the whole file.
pub fn read_trades<R: io::Read>(reader: R) -> Result<Vec<RawTrade>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<&str> = INPUT_COLUMNS
        .iter()
        .copied()
        .filter(|name| position(*name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing.join(", ")));
    }

    // The columns were all found above.
    let idx: Vec<usize> = INPUT_COLUMNS.iter().filter_map(|name| position(*name)).collect();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        // With flexible records the reader only fails on I/O.
        let record = record?;
        let cell = |i: usize| {
            record
                .get(idx[i])
                .filter(|bytes| !bytes.is_empty())
                .map(|bytes| match std::str::from_utf8(bytes) {
                    Ok(value) => CellValue::Text(value.to_string()),
                    Err(_) => {
                        tracing::warn!(
                            line = ?record.position().map(|p| p.line()),
                            column = INPUT_COLUMNS[i],
                            "Cell is not valid UTF-8"
                        );
                        CellValue::Unsupported("text that is not valid UTF-8".to_string())
                    }
                })
        };
        rows.push(RawTrade {
            trade_id: cell(0),
            spread_name: cell(1),
            entry_date: cell(2),
            size: cell(3),
            entry_price: cell(4),
            current_price: cell(5),
            profit_target_price: cell(6),
        });
    }

    tracing::debug!(rows = rows.len(), "Read trade input file");
    Ok(rows)
}

/// Writes typed trades as an input CSV, e.g. to seed a new portfolio file.
pub fn write_trades<W: io::Write>(writer: W, trades: &[Trade]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(INPUT_COLUMNS)?;
    for trade in trades {
        wtr.serialize(trade)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const INPUT: &str = "\
trade_id,spread_name,entry_date,size,entry_price,current_price,profit_target_price
1,CAPI/PANA Q4,2025-09-15,8,5000,6562.5,6800
2, PANA/SUPRA Q1 ,2025-10-01,4,3000,,4000
";

    #[test]
    fn reads_rows_as_text_cells() {
        let rows = read_trades(INPUT.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].current_price, Some(CellValue::Text("6562.5".to_string())));
        assert_eq!(rows[1].spread_name, Some(CellValue::Text("PANA/SUPRA Q1".to_string())));
        assert_eq!(rows[1].current_price, None);

        let trade = Trade::from_raw(0, &rows[0]).unwrap();
        assert_eq!(trade.entry_date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert!(Trade::from_raw(1, &rows[1]).is_err());
    }

    #[test]
    fn column_order_does_not_matter_and_extras_are_ignored() {
        let input = "\
notes,profit_target_price,current_price,entry_price,size,entry_date,spread_name,trade_id
hello,4000,2550,3000,4,2025-10-01,PANA/SUPRA Q1,2
";
        let rows = read_trades(input.as_bytes()).unwrap();
        let trade = Trade::from_raw(0, &rows[0]).unwrap();
        assert_eq!(trade.trade_id, 2);
        assert_eq!(trade.profit_target_price, 4000.0);
        assert_eq!(trade.current_price, 2550.0);
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = read_trades("trade_id,spread_name\n1,X\n".as_bytes()).unwrap_err();
        match err {
            Error::MissingColumns(cols) => {
                assert_eq!(cols, "entry_date, size, entry_price, current_price, profit_target_price")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn written_trades_read_back() {
        let trade = Trade {
            trade_id: 3,
            spread_name: "ROUTE 6 Q4".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            size: 6.0,
            entry_price: 4000.0,
            current_price: 3466.0,
            profit_target_price: 5000.0,
        };
        let mut buffer = Vec::new();
        write_trades(&mut buffer, std::slice::from_ref(&trade)).unwrap();

        let rows = read_trades(buffer.as_slice()).unwrap();
        assert_eq!(Trade::from_raw(0, &rows[0]).unwrap(), trade);
    }

    #[test]
    fn invalid_utf8_rejects_only_its_row() {
        let mut input = Vec::new();
        input.extend_from_slice(b"trade_id,spread_name,entry_date,size,entry_price,current_price,profit_target_price\n");
        input.extend_from_slice(b"1,CAPI/PANA Q4,2025-09-15,8,5000,6562.5,6800\n");
        input.extend_from_slice(b"2,\xFF\xFE,2025-10-01,4,3000,2550,4000\n");
        input.extend_from_slice(b"3,ROUTE 6 Q4,2025-10-05,6,4000,3466,5000\n");

        let rows = read_trades(input.as_slice()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[1].spread_name, Some(CellValue::Unsupported(_))));

        let (trades, rejected) = core_types::parse::parse_rows(&rows);
        let ids: Vec<i64> = trades.iter().map(|t| t.trade_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(matches!(
            rejected[..],
            [core_types::Error::Parse { row: 1, field: "spread_name", .. }]
        ));
    }
}
