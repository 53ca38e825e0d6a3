//! Command-line entry point
//!
//! Thin wrapper over the ingestion and chart services: register CSV files
//! in a catalog, attach dashboards, and print their chart payloads as
//! JSON. The catalog path comes first so every subcommand shares it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use cb_core::{ChartConfig, TabularSource};
use cb_data::CsvTableSource;
use cb_store::{Catalog, ChartCache, ChartService, IngestService};

const USAGE: &str = "\
usage: chartboard <catalog.db> <command> [args]

commands:
  inspect <file.csv>                        preview a CSV's schema and row count
  ingest <name> <file.csv>                  validate a CSV and register it
  sources                                   list registered data sources
  dashboard <source-id> <name> <type> [config-json]
                                            save a dashboard over a source
  chart <dashboard-id>                      print the dashboard's payload
  columns <source-id>                       print a source's stored columns";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("{USAGE}");
    }

    let catalog_path = Path::new(&args[0]);
    let catalog = Arc::new(Mutex::new(Catalog::open(catalog_path)?));
    let cache = Arc::new(ChartCache::new());

    // File names in the catalog resolve against the catalog's directory.
    let base_dir = catalog_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let ingest = IngestService::new(catalog.clone(), &base_dir);
    let charts = ChartService::new(catalog.clone(), cache, &base_dir);

    match (args[1].as_str(), &args[2..]) {
        ("inspect", [file]) => {
            let source = CsvTableSource::new(base_dir.join(file));
            let rows = source.row_count().await?;
            let schema = source.schema().await?;

            println!("{}: {rows} data rows", source.source_name());
            for column in schema {
                println!("{}  {}", column.name, column.column_type);
            }
        }
        ("ingest", [name, file]) => {
            let source = ingest
                .create_source(name, file)
                .await
                .with_context(|| format!("failed to ingest {file}"))?;
            info!(id = %source.id, rows = source.total_rows, "data source registered");
            println!("{}", source.id);
        }
        ("sources", []) => {
            let sources = catalog.lock().list_sources()?;
            for source in sources {
                println!(
                    "{}  {}  {} rows  ({})",
                    source.id, source.name, source.total_rows, source.file
                );
            }
        }
        ("dashboard", [source_id, name, chart_type, config_json @ ..]) => {
            let config: ChartConfig = match config_json {
                [json] => serde_json::from_str(json).context("invalid config JSON")?,
                [] => ChartConfig::default(),
                _ => bail!("{USAGE}"),
            };
            let dashboard = charts
                .create_dashboard(parse_id(source_id)?, name, chart_type, config)
                .await?;
            println!("{}", dashboard.id);
        }
        ("chart", [dashboard_id]) => {
            let view = charts.chart_view(parse_id(dashboard_id)?).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        ("columns", [source_id]) => {
            let columns = catalog.lock().source_columns(parse_id(source_id)?)?;
            for column in columns {
                println!("{}  {}", column.name, column.column_type);
            }
        }
        _ => bail!("{USAGE}"),
    }

    Ok(())
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("invalid id {value:?}"))
}
