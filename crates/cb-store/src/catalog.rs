//! SQLite-backed catalog of data sources, their columns, and dashboards

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;
use uuid::Uuid;

use cb_core::{ColumnType, Dashboard, DataColumn, DataSource};

use crate::StoreError;

/// Metadata catalog over a single SQLite connection.
///
/// Schema inference results and row counts land here once per ingestion;
/// the raw CSV content never does.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (and initialize) a catalog database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let catalog = Self { conn };
        catalog.init_schema()?;
        info!(path = %path.display(), "opened catalog");
        Ok(catalog)
    }

    /// Open an in-memory catalog, mainly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let catalog = Self { conn };
        catalog.init_schema()?;
        Ok(catalog)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS data_sources (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                file TEXT NOT NULL,
                total_rows INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS data_columns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                data_source_id TEXT NOT NULL
                    REFERENCES data_sources(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS dashboards (
                id TEXT PRIMARY KEY,
                data_source_id TEXT NOT NULL
                    REFERENCES data_sources(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                chart_type TEXT NOT NULL,
                config TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_data_columns_source
                ON data_columns(data_source_id);
            CREATE INDEX IF NOT EXISTS idx_dashboards_source
                ON dashboards(data_source_id);
            ",
        )?;
        Ok(())
    }

    /// Insert a data source with its inferred columns, all-or-nothing
    pub fn insert_source(
        &mut self,
        source: &DataSource,
        columns: &[DataColumn],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO data_sources (id, name, file, total_rows, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                source.id.to_string(),
                source.name,
                source.file,
                source.total_rows as i64,
                source.created_at.to_rfc3339(),
                source.updated_at.to_rfc3339(),
            ],
        )?;

        Self::insert_columns(&tx, source.id, columns)?;

        tx.commit()?;
        Ok(())
    }

    /// Update a source row and swap its columns for freshly inferred ones
    pub fn replace_source(
        &mut self,
        source: &DataSource,
        columns: &[DataColumn],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE data_sources SET name = ?2, file = ?3, total_rows = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                source.id.to_string(),
                source.name,
                source.file,
                source.total_rows as i64,
                source.updated_at.to_rfc3339(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound("data source"));
        }

        tx.execute(
            "DELETE FROM data_columns WHERE data_source_id = ?1",
            params![source.id.to_string()],
        )?;
        Self::insert_columns(&tx, source.id, columns)?;

        tx.commit()?;
        Ok(())
    }

    /// Update a source row without touching its columns
    pub fn update_source(&self, source: &DataSource) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE data_sources SET name = ?2, file = ?3, total_rows = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                source.id.to_string(),
                source.name,
                source.file,
                source.total_rows as i64,
                source.updated_at.to_rfc3339(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound("data source"));
        }
        Ok(())
    }

    fn insert_columns(
        tx: &rusqlite::Transaction<'_>,
        source_id: Uuid,
        columns: &[DataColumn],
    ) -> Result<(), StoreError> {
        let mut stmt = tx.prepare(
            "INSERT INTO data_columns (data_source_id, name, type) VALUES (?1, ?2, ?3)",
        )?;
        for column in columns {
            stmt.execute(params![
                source_id.to_string(),
                column.name,
                column.column_type.as_str(),
            ])?;
        }
        Ok(())
    }

    /// Fetch one data source by id
    pub fn get_source(&self, id: Uuid) -> Result<DataSource, StoreError> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, name, file, total_rows, created_at, updated_at
                 FROM data_sources WHERE id = ?1",
                params![id.to_string()],
                Self::raw_source,
            )
            .optional()?;

        raw.map(Self::source_from_raw)
            .transpose()?
            .ok_or(StoreError::NotFound("data source"))
    }

    /// All data sources, most recently created first
    pub fn list_sources(&self) -> Result<Vec<DataSource>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, file, total_rows, created_at, updated_at
             FROM data_sources ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], Self::raw_source)?;

        let mut sources = Vec::new();
        for row in rows {
            sources.push(Self::source_from_raw(row?)?);
        }
        Ok(sources)
    }

    /// Persisted columns of a data source, in insertion order
    pub fn source_columns(&self, id: Uuid) -> Result<Vec<DataColumn>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT data_source_id, name, type FROM data_columns
             WHERE data_source_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            let (source_id, name, column_type) = row?;
            columns.push(DataColumn {
                data_source_id: parse_uuid(&source_id)?,
                name,
                column_type: parse_column_type(&column_type)?,
            });
        }
        Ok(columns)
    }

    /// Delete sources by id; cascades to columns and dashboards
    pub fn delete_sources(&mut self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut deleted = 0;
        for id in ids {
            deleted += tx.execute(
                "DELETE FROM data_sources WHERE id = ?1",
                params![id.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Insert a dashboard
    pub fn insert_dashboard(&self, dashboard: &Dashboard) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO dashboards
                 (id, data_source_id, name, chart_type, config, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                dashboard.id.to_string(),
                dashboard.data_source_id.to_string(),
                dashboard.name,
                dashboard.chart_type,
                serde_json::to_string(&dashboard.config)?,
                dashboard.created_at.to_rfc3339(),
                dashboard.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Fetch one dashboard by id
    pub fn get_dashboard(&self, id: Uuid) -> Result<Dashboard, StoreError> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, data_source_id, name, chart_type, config, created_at, updated_at
                 FROM dashboards WHERE id = ?1",
                params![id.to_string()],
                Self::raw_dashboard,
            )
            .optional()?;

        raw.map(Self::dashboard_from_raw)
            .transpose()?
            .ok_or(StoreError::NotFound("dashboard"))
    }

    /// All dashboards, most recently created first
    pub fn list_dashboards(&self) -> Result<Vec<Dashboard>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data_source_id, name, chart_type, config, created_at, updated_at
             FROM dashboards ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], Self::raw_dashboard)?;

        let mut dashboards = Vec::new();
        for row in rows {
            dashboards.push(Self::dashboard_from_raw(row?)?);
        }
        Ok(dashboards)
    }

    /// Update a dashboard's name, backing source, and configuration
    pub fn update_dashboard(&self, dashboard: &Dashboard) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE dashboards
             SET data_source_id = ?2, name = ?3, chart_type = ?4, config = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                dashboard.id.to_string(),
                dashboard.data_source_id.to_string(),
                dashboard.name,
                dashboard.chart_type,
                serde_json::to_string(&dashboard.config)?,
                dashboard.updated_at.to_rfc3339(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound("dashboard"));
        }
        Ok(())
    }

    /// Delete dashboards by id
    pub fn delete_dashboards(&mut self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut deleted = 0;
        for id in ids {
            deleted += tx.execute(
                "DELETE FROM dashboards WHERE id = ?1",
                params![id.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(deleted)
    }
}

// Raw row tuples keep the rusqlite closures infallible; conversion to
// domain types happens outside them so errors surface as StoreError.
type RawSource = (String, String, String, i64, String, String);
type RawDashboard = (String, String, String, String, String, String, String);

impl Catalog {
    fn raw_source(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSource> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn source_from_raw(
        (id, name, file, total_rows, created_at, updated_at): RawSource,
    ) -> Result<DataSource, StoreError> {
        Ok(DataSource {
            id: parse_uuid(&id)?,
            name,
            file,
            total_rows: total_rows.max(0) as usize,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn raw_dashboard(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDashboard> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    }

    fn dashboard_from_raw(
        (id, data_source_id, name, chart_type, config, created_at, updated_at): RawDashboard,
    ) -> Result<Dashboard, StoreError> {
        Ok(Dashboard {
            id: parse_uuid(&id)?,
            data_source_id: parse_uuid(&data_source_id)?,
            name,
            chart_type,
            config: serde_json::from_str(&config)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::InvalidData(format!("uuid {value:?}: {e}")))
}

fn parse_column_type(value: &str) -> Result<ColumnType, StoreError> {
    value
        .parse()
        .map_err(|e| StoreError::InvalidData(format!("column type {value:?}: {e}")))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("timestamp {value:?}: {e}")))
}
