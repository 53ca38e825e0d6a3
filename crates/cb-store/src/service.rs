//! Ingestion and chart-view services
//!
//! The blocking CSV work runs on the tokio blocking pool; catalog access
//! is brief and happens on the calling task. The chart-view path consults
//! the mtime-keyed cache before touching the file at all.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use cb_charts::build_chart_data;
use cb_core::{ChartConfig, ChartData, ColumnSchema, Dashboard, DataColumn, DataSource, Record};
use cb_data::{CsvError, CsvProcessor, DEFAULT_SAMPLE_SIZE};

use crate::cache::{ChartCache, ChartCacheKey};
use crate::catalog::Catalog;
use crate::StoreError;

/// What a chart request renders to: the raw records for table dashboards,
/// a built series payload for everything else
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartView {
    Table { records: Vec<Record> },
    Chart { chart: ChartData },
}

/// Registers CSV files as data sources.
///
/// Ingestion derives the row count and schema once, inside one catalog
/// transaction: a file that fails validation registers nothing.
pub struct IngestService {
    catalog: Arc<Mutex<Catalog>>,

    /// Directory the stored `file` names resolve against
    base_dir: PathBuf,
}

impl IngestService {
    pub fn new(catalog: Arc<Mutex<Catalog>>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            base_dir: base_dir.into(),
        }
    }

    /// Validate `file` and register it as a named data source
    pub async fn create_source(&self, name: &str, file: &str) -> Result<DataSource, StoreError> {
        let path = self.base_dir.join(file);
        let (total_rows, schema) = analyze_csv(path).await?;

        let source = DataSource::new(name, file, total_rows);
        let columns = to_columns(source.id, schema);

        self.catalog.lock().insert_source(&source, &columns)?;

        info!(id = %source.id, name = %source.name, rows = total_rows, "registered data source");
        Ok(source)
    }

    /// Rename a source and/or swap its backing file.
    ///
    /// A changed file is re-validated and re-analyzed; row count and
    /// columns are refreshed together. An unchanged file only updates the
    /// name.
    pub async fn replace_source_file(
        &self,
        id: Uuid,
        name: &str,
        file: &str,
    ) -> Result<DataSource, StoreError> {
        let mut source = self.catalog.lock().get_source(id)?;

        let file_changed = source.file != file;
        source.name = name.to_string();
        source.updated_at = chrono::Utc::now();

        if !file_changed {
            self.catalog.lock().update_source(&source)?;
            return Ok(source);
        }

        source.file = file.to_string();
        let path = self.base_dir.join(file);
        let (total_rows, schema) = analyze_csv(path).await?;
        source.total_rows = total_rows;
        let columns = to_columns(source.id, schema);

        self.catalog.lock().replace_source(&source, &columns)?;

        info!(id = %source.id, file = %source.file, rows = total_rows, "replaced data source file");
        Ok(source)
    }

    /// Delete sources (their columns and dashboards cascade away)
    pub async fn delete_sources(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        self.catalog.lock().delete_sources(ids)
    }
}

/// Serves dashboard chart payloads, with per-file-version caching
pub struct ChartService {
    catalog: Arc<Mutex<Catalog>>,
    cache: Arc<ChartCache>,

    /// Directory the stored `file` names resolve against
    base_dir: PathBuf,
}

impl ChartService {
    pub fn new(
        catalog: Arc<Mutex<Catalog>>,
        cache: Arc<ChartCache>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            cache,
            base_dir: base_dir.into(),
        }
    }

    /// Save a dashboard over an existing data source
    pub async fn create_dashboard(
        &self,
        data_source_id: Uuid,
        name: &str,
        chart_type: &str,
        config: ChartConfig,
    ) -> Result<Dashboard, StoreError> {
        let catalog = self.catalog.lock();
        catalog.get_source(data_source_id)?;

        let dashboard = Dashboard::new(data_source_id, name, chart_type, config);
        catalog.insert_dashboard(&dashboard)?;
        Ok(dashboard)
    }

    /// Build (or serve from cache) the view for a dashboard.
    ///
    /// A cache hit skips the file read entirely; a miss reads the full
    /// record set on the blocking pool, builds the view, and caches it
    /// under the file's current modification time.
    pub async fn chart_view(&self, dashboard_id: Uuid) -> Result<ChartView, StoreError> {
        let (dashboard, source) = {
            let catalog = self.catalog.lock();
            let dashboard = catalog.get_dashboard(dashboard_id)?;
            let source = catalog.get_source(dashboard.data_source_id)?;
            (dashboard, source)
        };

        let path = self.base_dir.join(&source.file);
        let key = ChartCacheKey::for_path(dashboard_id, &path)?;

        if let Some(view) = self.cache.get(&key) {
            debug!(dashboard = %dashboard_id, "chart cache hit");
            return Ok(view);
        }

        let records = {
            let path = path.clone();
            tokio::task::spawn_blocking(move || CsvProcessor::new().read_records(&path)).await??
        };

        let view = if dashboard.chart_type == "table" {
            ChartView::Table { records }
        } else {
            let chart = build_chart_data(&dashboard, &records, &dashboard.config);
            ChartView::Chart { chart }
        };

        self.cache.put(key, view.clone());
        debug!(dashboard = %dashboard_id, "chart cache filled");
        Ok(view)
    }
}

/// Validate, count, and infer in one pass over the blocking pool
async fn analyze_csv(path: PathBuf) -> Result<(usize, Vec<ColumnSchema>), StoreError> {
    let result = tokio::task::spawn_blocking(move || {
        let mut processor = CsvProcessor::new();
        processor.validate_file(&path, true, DEFAULT_SAMPLE_SIZE)?;
        let total_rows = processor.count_rows(&path, false)?;
        let schema = processor.extract_schema(&path, DEFAULT_SAMPLE_SIZE)?;
        Ok::<_, CsvError>((total_rows, schema))
    })
    .await?;

    Ok(result?)
}

fn to_columns(source_id: Uuid, schema: Vec<ColumnSchema>) -> Vec<DataColumn> {
    schema
        .into_iter()
        .map(|column| DataColumn {
            data_source_id: source_id,
            name: column.name,
            column_type: column.column_type,
        })
        .collect()
}
