//! Catalog entities: data sources, their columns, and dashboards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::ChartConfig;
use crate::schema::ColumnType;

/// A registered CSV-backed data source.
///
/// `file` is the storage-relative file name; resolving it against the
/// upload directory is the owning service's job. `total_rows` and the
/// associated [`DataColumn`]s are derived once at ingestion time and only
/// refreshed when the file is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: Uuid,
    pub name: String,
    pub file: String,
    pub total_rows: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DataSource {
    /// Create a new data source entity with fresh id and timestamps
    pub fn new(name: impl Into<String>, file: impl Into<String>, total_rows: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            file: file.into(),
            total_rows,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persisted column metadata produced by schema inference.
///
/// Descriptive only: chart building re-derives value types from the raw
/// cell strings at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    pub data_source_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// A saved chart definition over a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: Uuid,
    pub data_source_id: Uuid,
    pub name: String,
    pub chart_type: String,
    pub config: ChartConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dashboard {
    /// Create a new dashboard entity with fresh id and timestamps
    pub fn new(
        data_source_id: Uuid,
        name: impl Into<String>,
        chart_type: impl Into<String>,
        config: ChartConfig,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            data_source_id,
            name: name.into(),
            chart_type: chart_type.into(),
            config,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entities_get_distinct_ids() {
        let a = DataSource::new("sales", "sales.csv", 10);
        let b = DataSource::new("sales", "sales.csv", 10);
        assert_ne!(a.id, b.id);

        let dash = Dashboard::new(a.id, "monthly", "bar", ChartConfig::default());
        assert_eq!(dash.data_source_id, a.id);
        assert_eq!(dash.chart_type, "bar");
    }
}
