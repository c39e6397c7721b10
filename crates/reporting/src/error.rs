// In crates/reporting/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Trade file is missing required columns: {0}")]
    MissingColumns(String),
}

pub type Result<T> = std::result::Result<T, Error>;
