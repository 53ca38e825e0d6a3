//! Catalog persistence and chart serving
//!
//! Stores data-source and dashboard metadata in SQLite, caches built
//! chart payloads keyed by file modification time, and exposes the
//! ingestion and chart-view services that tie the CSV engine and the
//! chart builder together.

pub mod cache;
pub mod catalog;
pub mod service;

use thiserror::Error;

use cb_data::CsvError;

// Re-exports
pub use cache::{ChartCache, ChartCacheKey};
pub use catalog::Catalog;
pub use service::{ChartService, ChartView, IngestService};

/// Errors from catalog and service operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid stored value: {0}")]
    InvalidData(String),
}
