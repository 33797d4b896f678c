//! Output module for writing extracted records
//!
//! Records are written once per run as a CSV file that spreadsheet tools open
//! without mangling Japanese text (UTF-8 with a byte-order mark).

mod csv_sink;

pub use csv_sink::{result_path, write_records, CsvSink};

use crate::extract::ListingRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the records of a run
pub trait ResultSink {
    /// Writes the full record sequence, preserving order
    fn write(&mut self, records: &[ListingRecord]) -> OutputResult<()>;
}
