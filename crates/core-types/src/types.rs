// In crates/core-types/src/types.rs

use chrono::NaiveDate;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single cell from the editable trade table.
///
/// The table hands us whatever the user typed, so a cell may be a number
/// or free text. Values that are neither (booleans, lists, nested tables)
/// are kept as `Unsupported` so that only their own row is rejected.
/// Conversion to a semantic type happens in `parse`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Describes the value that was found, e.g. `true` or `a list`.
    Unsupported(String),
}

impl CellValue {
    /// Empty or whitespace-only text counts as a missing cell.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) | CellValue::Unsupported(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

/// Accepts any self-describing value so one odd cell never fails a whole document.
struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
        Ok(CellValue::Unsupported(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
        Ok(CellValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
        Ok(i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
        Ok(CellValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
        Ok(CellValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
        Ok(CellValue::Text(v))
    }

    fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<CellValue, E> {
        Ok(CellValue::Unsupported("raw bytes".to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<CellValue, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(CellValue::Unsupported("a list".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CellValue, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(CellValue::Unsupported("a table".to_string()))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

/// One untyped row of the portfolio snapshot, exactly as it arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    #[serde(default)]
    pub trade_id: Option<CellValue>,
    #[serde(default)]
    pub spread_name: Option<CellValue>,
    #[serde(default)]
    pub entry_date: Option<CellValue>,
    #[serde(default)]
    pub size: Option<CellValue>,
    #[serde(default)]
    pub entry_price: Option<CellValue>,
    #[serde(default)]
    pub current_price: Option<CellValue>,
    #[serde(default)]
    pub profit_target_price: Option<CellValue>,
}

/// Deserializes a list of trade rows, one `RawTrade` per element.
///
/// An element that isn't a row at all (a bare number, a string) becomes an
/// empty `RawTrade` so it is rejected on its own and row numbers stay aligned.
pub fn deserialize_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawTrade>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Row {
        Cells(RawTrade),
        Other(IgnoredAny),
    }

    let rows = Vec::<Row>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| match row {
            Row::Cells(raw) => raw,
            Row::Other(_) => RawTrade::default(),
        })
        .collect())
}

/// An open spread trade after input validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: i64,
    pub spread_name: String,
    pub entry_date: NaiveDate,
    /// Signed quantity in lots. Used purely as a multiplier.
    pub size: f64,
    pub entry_price: f64,
    pub current_price: f64,
    pub profit_target_price: f64,
}

impl From<&Trade> for RawTrade {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: Some(CellValue::Int(trade.trade_id)),
            spread_name: Some(CellValue::Text(trade.spread_name.clone())),
            entry_date: Some(CellValue::Text(trade.entry_date.format("%Y-%m-%d").to_string())),
            size: Some(CellValue::Float(trade.size)),
            entry_price: Some(CellValue::Float(trade.entry_price)),
            current_price: Some(CellValue::Float(trade.current_price)),
            profit_target_price: Some(CellValue::Float(trade.profit_target_price)),
        }
    }
}

/// Risk category derived from how close a trade sits to its stop-loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    HighAlert,
    Watch,
    Ok,
}

impl Status {
    /// The human-readable label shown in the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Status::HighAlert => "High Alert",
            Status::Watch => "Watch",
            Status::Ok => "OK",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A trade together with every metric computed for it during one evaluation.
///
/// Ratios whose denominator is zero are stored as `f64::NAN`. Field order is
/// the column order of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTrade {
    pub trade_id: i64,
    pub spread_name: String,
    pub entry_date: NaiveDate,
    pub size: f64,
    pub entry_price: f64,
    pub current_price: f64,
    pub profit_target_price: f64,

    pub stop_loss_price: f64,
    pub pnl_per_lot: f64,
    pub pnl_usd: f64,
    pub pnl_pct: f64,
    pub prox_profit_target_pct: f64,
    pub prox_stop_loss_pct: f64,
    pub days_open: i64,
    pub time_stop_days: i64,
    pub time_stop_reached: bool,
    pub status: Status,
}

impl DerivedTrade {
    /// Names of the derived ratios that came out undefined for this trade,
    /// either from a zero denominator or from inputs large enough to overflow.
    pub fn undefined_fields(&self) -> Vec<&'static str> {
        [
            ("pnl_pct", self.pnl_pct),
            ("prox_profit_target_pct", self.prox_profit_target_pct),
            ("prox_stop_loss_pct", self.prox_stop_loss_pct),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_nan())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Portfolio-wide aggregates over one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_pnl_usd: f64,
    /// Unrealized losses as a percentage of total capital. NaN when capital is not positive.
    pub pct_capital_at_risk: f64,
    pub trade_count: usize,

    pub total_capital: f64,
    pub high_alert_count: usize,
    pub watch_count: usize,
    pub time_stop_count: usize,
    pub max_loss_per_trade_usd: f64,
    pub over_loss_limit_count: usize,
}
