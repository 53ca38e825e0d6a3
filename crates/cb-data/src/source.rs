//! CSV-backed implementation of the `TabularSource` trait
//!
//! The processor itself is synchronous; this wrapper owns one behind a
//! mutex so the delimiter memo survives across calls, and dispatches each
//! read onto the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use cb_core::{ColumnSchema, Record, TabularSource};

use crate::processor::{CsvProcessor, DEFAULT_SAMPLE_SIZE};

/// A CSV file exposed as a tabular data source
pub struct CsvTableSource {
    /// Path to the CSV file
    path: PathBuf,

    /// Shared processor; keeps delimiter detection to one pass per file
    processor: Arc<Mutex<CsvProcessor>>,

    /// Display name (file name portion of the path)
    source_name: String,
}

impl CsvTableSource {
    /// Create a source over `path`; no I/O happens until the first read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();

        info!(path = %path.display(), "created CSV table source");

        Self {
            path,
            processor: Arc::new(Mutex::new(CsvProcessor::new())),
            source_name,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TabularSource for CsvTableSource {
    async fn schema(&self) -> anyhow::Result<Vec<ColumnSchema>> {
        let processor = self.processor.clone();
        let path = self.path.clone();

        let schema = tokio::task::spawn_blocking(move || {
            processor.lock().extract_schema(&path, DEFAULT_SAMPLE_SIZE)
        })
        .await??;

        Ok(schema)
    }

    async fn row_count(&self) -> anyhow::Result<usize> {
        let processor = self.processor.clone();
        let path = self.path.clone();

        let count =
            tokio::task::spawn_blocking(move || processor.lock().count_rows(&path, false))
                .await??;

        Ok(count)
    }

    async fn records(&self) -> anyhow::Result<Vec<Record>> {
        let processor = self.processor.clone();
        let path = self.path.clone();

        let records =
            tokio::task::spawn_blocking(move || processor.lock().read_records(&path)).await??;

        Ok(records)
    }

    fn source_name(&self) -> &str {
        &self.source_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ColumnType;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_source_reads_schema_rows_and_records() {
        let file = csv_file("city,population\nParis,2100000\nLyon,520000\n");
        let source = CsvTableSource::new(file.path());

        let schema = source.schema().await.unwrap();
        assert_eq!(schema[0].name, "city");
        assert_eq!(schema[0].column_type, ColumnType::String);
        assert_eq!(schema[1].column_type, ColumnType::Integer);

        assert_eq!(source.row_count().await.unwrap(), 2);

        let records = source.records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["city"], "Lyon");
    }

    #[tokio::test]
    async fn test_source_name_is_file_name() {
        let source = CsvTableSource::new("/data/uploads/sales.csv");
        assert_eq!(source.source_name(), "sales.csv");
    }
}
