// In crates/core-types/src/parse.rs

use crate::types::{CellValue, RawTrade, Trade};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

impl Trade {
    /// Converts an untyped table row into a `Trade`.
    ///
    /// `row` is the zero-based position of the row in the snapshot and is only
    /// used for diagnostics. The first field that fails to convert is reported.
    pub fn from_raw(row: usize, raw: &RawTrade) -> Result<Trade> {
        Ok(Trade {
            trade_id: parse_id(row, "trade_id", raw.trade_id.as_ref())?,
            spread_name: parse_name(row, "spread_name", raw.spread_name.as_ref())?,
            entry_date: parse_date(row, "entry_date", raw.entry_date.as_ref())?,
            size: parse_number(row, "size", raw.size.as_ref())?,
            entry_price: parse_number(row, "entry_price", raw.entry_price.as_ref())?,
            current_price: parse_number(row, "current_price", raw.current_price.as_ref())?,
            profit_target_price: parse_number(
                row,
                "profit_target_price",
                raw.profit_target_price.as_ref(),
            )?,
        })
    }
}

/// Splits a snapshot into the rows that parsed and one error per rejected row.
pub fn parse_rows(rows: &[RawTrade]) -> (Vec<Trade>, Vec<Error>) {
    let mut trades = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for (row, raw) in rows.iter().enumerate() {
        match Trade::from_raw(row, raw) {
            Ok(trade) => trades.push(trade),
            Err(e) => rejected.push(e),
        }
    }
    (trades, rejected)
}

fn present<'a>(row: usize, field: &'static str, cell: Option<&'a CellValue>) -> Result<&'a CellValue> {
    match cell {
        Some(value) if !value.is_blank() => Ok(value),
        _ => Err(Error::Parse {
            row,
            field,
            reason: "is missing".to_string(),
        }),
    }
}

/// Rejects a cell that is neither a number nor text.
fn unsupported(row: usize, field: &'static str, found: &str) -> Error {
    Error::Parse {
        row,
        field,
        reason: format!("has an unsupported value: {}", found),
    }
}

fn parse_name(row: usize, field: &'static str, cell: Option<&CellValue>) -> Result<String> {
    match cell {
        Some(CellValue::Unsupported(found)) => Err(unsupported(row, field, found)),
        Some(value) => Ok(value.to_string().trim().to_string()),
        None => Ok(String::new()),
    }
}

fn parse_id(row: usize, field: &'static str, cell: Option<&CellValue>) -> Result<i64> {
    let invalid = |shown: String| Error::Parse {
        row,
        field,
        reason: format!("is not an integer: {:?}", shown),
    };
    match present(row, field, cell)? {
        CellValue::Int(v) => Ok(*v),
        CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Ok(*v as i64),
        CellValue::Float(v) => Err(invalid(v.to_string())),
        CellValue::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid(s.clone())),
        CellValue::Unsupported(found) => Err(unsupported(row, field, found)),
    }
}

fn parse_number(row: usize, field: &'static str, cell: Option<&CellValue>) -> Result<f64> {
    let value = match present(row, field, cell)? {
        CellValue::Int(v) => *v as f64,
        CellValue::Float(v) => *v,
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| Error::Parse {
            row,
            field,
            reason: format!("is not a number: {:?}", s),
        })?,
        CellValue::Unsupported(found) => return Err(unsupported(row, field, found)),
    };

    // `str::parse` happily accepts "NaN" and "inf"; neither is a usable price.
    if !value.is_finite() {
        return Err(Error::Parse {
            row,
            field,
            reason: format!("must be a finite number, got {}", value),
        });
    }
    Ok(value)
}

fn parse_date(row: usize, field: &'static str, cell: Option<&CellValue>) -> Result<NaiveDate> {
    let text = match present(row, field, cell)? {
        CellValue::Text(s) => s.trim(),
        CellValue::Unsupported(found) => return Err(unsupported(row, field, found)),
        other => {
            return Err(Error::Parse {
                row,
                field,
                reason: format!("is not a date: {}", other),
            });
        }
    };

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
        .map_err(|_| Error::Parse {
            row,
            field,
            reason: format!("is not a YYYY-MM-DD date: {:?}", text),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> RawTrade {
        RawTrade {
            trade_id: Some(1i64.into()),
            spread_name: Some("CAPI/PANA Q4".into()),
            entry_date: Some("2025-09-15".into()),
            size: Some(8i64.into()),
            entry_price: Some(5000i64.into()),
            current_price: Some(6562.5.into()),
            profit_target_price: Some(6800i64.into()),
        }
    }

    #[test]
    fn parses_a_well_formed_row() {
        let trade = Trade::from_raw(0, &raw_row()).unwrap();
        assert_eq!(trade.trade_id, 1);
        assert_eq!(trade.spread_name, "CAPI/PANA Q4");
        assert_eq!(trade.entry_date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert_eq!(trade.size, 8.0);
        assert_eq!(trade.current_price, 6562.5);
    }

    #[test]
    fn accepts_numeric_text_and_timestamps() {
        let mut raw = raw_row();
        raw.trade_id = Some(" 7 ".into());
        raw.entry_price = Some("5000.25".into());
        raw.entry_date = Some("2025-09-15T10:30:00Z".into());
        let trade = Trade::from_raw(0, &raw).unwrap();
        assert_eq!(trade.trade_id, 7);
        assert_eq!(trade.entry_price, 5000.25);
        assert_eq!(trade.entry_date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
    }

    #[test]
    fn rejects_unparseable_date() {
        let mut raw = raw_row();
        raw.entry_date = Some("15/09/2025".into());
        let err = Trade::from_raw(3, &raw).unwrap_err();
        assert!(matches!(err, Error::Parse { row: 3, field: "entry_date", .. }));
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_prices() {
        let mut raw = raw_row();
        raw.current_price = Some("abc".into());
        assert!(matches!(
            Trade::from_raw(0, &raw),
            Err(Error::Parse { field: "current_price", .. })
        ));

        raw.current_price = Some("NaN".into());
        assert!(matches!(
            Trade::from_raw(0, &raw),
            Err(Error::Parse { field: "current_price", .. })
        ));
    }

    #[test]
    fn blank_cells_count_as_missing() {
        let mut raw = raw_row();
        raw.size = Some("   ".into());
        let err = Trade::from_raw(0, &raw).unwrap_err();
        assert_eq!(err.to_string(), "row 0: field `size` is missing");
    }

    #[test]
    fn fractional_trade_id_is_rejected() {
        let mut raw = raw_row();
        raw.trade_id = Some(1.5.into());
        assert!(matches!(
            Trade::from_raw(0, &raw),
            Err(Error::Parse { field: "trade_id", .. })
        ));
    }

    #[test]
    fn parse_rows_keeps_going_after_a_bad_row() {
        let mut bad = raw_row();
        bad.size = None;
        let rows = vec![raw_row(), bad, raw_row()];

        let (trades, rejected) = parse_rows(&rows);
        assert_eq!(trades.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], Error::Parse { row: 1, field: "size", .. }));
    }

    #[test]
    fn cells_deserialize_from_mixed_json() {
        let raw: RawTrade = serde_json::from_str(
            r#"{"trade_id": 2, "spread_name": "PANA/SUPRA Q1", "entry_date": "2025-10-01",
                "size": "4", "entry_price": 3000, "current_price": 2550.0, "profit_target_price": null}"#,
        )
        .unwrap();
        assert_eq!(raw.trade_id, Some(CellValue::Int(2)));
        assert_eq!(raw.size, Some(CellValue::Text("4".to_string())));
        assert_eq!(raw.current_price, Some(CellValue::Float(2550.0)));
        assert_eq!(raw.profit_target_price, None);
    }

    #[test]
    fn odd_json_values_reject_only_their_row() {
        let rows: Vec<RawTrade> = serde_json::from_str(
            r#"[{"trade_id": 1, "spread_name": "CAPI/PANA Q4", "entry_date": "2025-09-15",
                 "size": 8, "entry_price": 5000, "current_price": 6562.5, "profit_target_price": 6800},
                {"trade_id": 2, "spread_name": "PANA/SUPRA Q1", "entry_date": "2025-10-01",
                 "size": true, "entry_price": [3000], "current_price": {"v": 1}, "profit_target_price": 4000}]"#,
        )
        .unwrap();
        assert_eq!(rows[1].size, Some(CellValue::Unsupported("true".to_string())));
        assert_eq!(rows[1].entry_price, Some(CellValue::Unsupported("a list".to_string())));
        assert_eq!(rows[1].current_price, Some(CellValue::Unsupported("a table".to_string())));

        let (trades, rejected) = parse_rows(&rows);
        assert_eq!(trades.len(), 1);
        assert_eq!(rejected[0].to_string(), "row 1: field `size` has an unsupported value: true");
    }

    #[test]
    fn elements_that_are_not_rows_keep_row_numbers_aligned() {
        #[derive(serde::Deserialize)]
        struct Snapshot {
            #[serde(deserialize_with = "crate::deserialize_rows")]
            trades: Vec<RawTrade>,
        }

        let snapshot: Snapshot = serde_json::from_str(
            r#"{"trades": [42, {"trade_id": 1, "spread_name": "CAPI/PANA Q4", "entry_date": "2025-09-15",
                 "size": 8, "entry_price": 5000, "current_price": 6562.5, "profit_target_price": 6800}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.trades[0], RawTrade::default());

        let (trades, rejected) = parse_rows(&snapshot.trades);
        assert_eq!(trades[0].trade_id, 1);
        assert!(matches!(rejected[..], [Error::Parse { row: 0, field: "trade_id", .. }]));
    }

    #[test]
    fn local_datetimes_give_their_date() {
        let mut raw = raw_row();
        raw.entry_date = Some("2025-09-15T10:30:00".into());
        let trade = Trade::from_raw(0, &raw).unwrap();
        assert_eq!(trade.entry_date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
    }
}
