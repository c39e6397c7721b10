// In crates/core-types/src/error.rs

use thiserror::Error;

/// Everything that can go wrong while turning a portfolio snapshot into risk metrics.
///
/// None of these are fatal to an evaluation. A `Parse` error drops a single row,
/// `DivisionUndefined` blanks a single field whose ratio has a zero denominator
/// or overflowed, and `Configuration` blanks the capital-dependent summary metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("row {row}: field `{field}` {reason}")]
    Parse {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("trade {trade_id}: `{field}` is undefined")]
    DivisionUndefined { trade_id: i64, field: &'static str },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
