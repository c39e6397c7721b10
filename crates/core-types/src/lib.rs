// In crates/core-types/src/lib.rs

pub mod error;
pub mod parse;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use types::{deserialize_rows, CellValue, DerivedTrade, PortfolioSummary, RawTrade, Status, Trade};
