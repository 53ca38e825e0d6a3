//! Core types for the chartboard platform
//!
//! This crate provides the shared data model: column types and schemas,
//! chart configuration and payload shapes, and the catalog entities that
//! tie dashboards to their backing CSV files.

pub mod catalog;
pub mod chart;
pub mod schema;

// Re-export commonly used types
pub use catalog::{Dashboard, DataColumn, DataSource};
pub use chart::{ChartConfig, ChartData, ChartStyle, ColorValue, Dataset, ScatterPoint, SeriesData};
pub use schema::{ColumnSchema, ColumnType};

/// A materialized CSV row keyed by header name, in column order.
pub type Record = indexmap::IndexMap<String, String>;

pub mod source {
    use crate::schema::ColumnSchema;
    use crate::Record;

    /// Trait for tabular data sources
    #[async_trait::async_trait]
    pub trait TabularSource: Send + Sync {
        /// Get the inferred schema of this source
        async fn schema(&self) -> anyhow::Result<Vec<ColumnSchema>>;

        /// Get the number of data rows (header excluded)
        async fn row_count(&self) -> anyhow::Result<usize>;

        /// Materialize all data rows as header-keyed records
        async fn records(&self) -> anyhow::Result<Vec<Record>>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}

pub use source::TabularSource;
