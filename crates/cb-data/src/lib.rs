//! CSV ingestion engine: delimiter detection, streaming reads, validation,
//! row counting, and sampled schema inference.
//!
//! Everything here is synchronous blocking file I/O by contract; the async
//! surface lives in [`source::CsvTableSource`], which dispatches the
//! blocking work onto the tokio blocking pool.

pub mod delimiter;
pub mod infer;
pub mod mime;
pub mod processor;
pub mod source;
pub mod stream;

use std::path::PathBuf;
use thiserror::Error;

use cb_core::ColumnType;

// Re-exports
pub use processor::{CsvProcessor, DEFAULT_SAMPLE_SIZE};
pub use source::CsvTableSource;
pub use stream::{is_empty_row, CsvStream};

/// Errors that can occur while processing a CSV file
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("file is not readable or not a valid CSV: {}", path.display())]
    NotReadable { path: PathBuf },

    #[error("invalid header or too few columns")]
    InvalidHeader,

    #[error("inconsistent column count at line {line}")]
    ColumnCountMismatch { line: usize },

    #[error("CSV file is empty or has no data")]
    EmptyFile,

    #[error("missing or invalid header")]
    MissingHeader,

    #[error("type mismatch at line {line} ({column}): expected {expected}, found {found}")]
    TypeMismatch {
        line: usize,
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },
}

impl From<csv::Error> for CsvError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                CsvError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => CsvError::Csv(error.to_string()),
        }
    }
}
