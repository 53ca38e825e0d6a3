//! Scatter charts: scatter, bubble
//!
//! One point per record in order; the payload carries no labels. Radius
//! comes from the configured `r` column, defaulting to 5 when the column
//! is unconfigured or the cell is missing.

use cb_core::{ChartConfig, ChartData, ColorValue, Dashboard, Dataset, Record, ScatterPoint, SeriesData};

use crate::builder::{numeric_cell, parse_or_zero, style_colors};
use crate::colors::DEFAULT_SCATTER_COLOR;

const DEFAULT_RADIUS: f64 = 5.0;

pub(crate) fn build_scatter_chart(
    dashboard: &Dashboard,
    records: &[Record],
    config: &ChartConfig,
) -> ChartData {
    let x_key = config.x.as_deref();
    let y_key = config.y.as_deref();

    let points: Vec<ScatterPoint> = records
        .iter()
        .map(|record| ScatterPoint {
            x: numeric_cell(record, x_key),
            y: numeric_cell(record, y_key),
            r: match config.r.as_deref() {
                Some(r_key) => record
                    .get(r_key)
                    .map(|v| parse_or_zero(v))
                    .unwrap_or(DEFAULT_RADIUS),
                None => DEFAULT_RADIUS,
            },
        })
        .collect();

    let color = style_colors(config)
        .and_then(|colors| colors.into_iter().next())
        .unwrap_or_else(|| DEFAULT_SCATTER_COLOR.to_string());

    ChartData {
        chart_type: Some(dashboard.chart_type.clone()),
        labels: None,
        datasets: vec![Dataset {
            label: dashboard.name.clone(),
            data: SeriesData::Points(points),
            background_color: Some(ColorValue::Single(color)),
            border_color: None,
            fill: None,
        }],
        error: None,
    }
}
