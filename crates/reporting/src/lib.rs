// In crates/reporting/src/lib.rs

pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod table;

pub use display::{format_for_display, format_summary, DisplayRow, SummaryDisplay};
pub use error::{Error, Result};
pub use export::{export_to_string, read_export, write_export, EXPORT_COLUMNS, EXPORT_FILE_NAME};
pub use import::{read_trades, write_trades, INPUT_COLUMNS};
pub use table::render_table;
