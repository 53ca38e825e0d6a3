//! Chart dispatch and shared coercion helpers

use tracing::debug;

use cb_core::{ChartConfig, ChartData, Dashboard, Record};

use crate::{category, scatter, xy};

/// Build a renderer-ready payload from materialized records.
///
/// `records` is the full in-memory table keyed by header name; every row
/// is visited to assemble the series. Unknown chart types come back as a
/// payload carrying an error message, not as a failure.
pub fn build_chart_data(dashboard: &Dashboard, records: &[Record], config: &ChartConfig) -> ChartData {
    let chart_type = dashboard.chart_type.to_lowercase();

    debug!(chart_type = %chart_type, records = records.len(), "building chart data");

    match chart_type.as_str() {
        "pie" | "doughnut" | "polararea" => category::build_category_chart(dashboard, records, config),
        "bar" | "line" | "radar" => xy::build_xy_chart(dashboard, records, config),
        "scatter" | "bubble" => scatter::build_scatter_chart(dashboard, records, config),
        _ => ChartData::unsupported(&chart_type),
    }
}

/// Forgiving numeric coercion: the trimmed full string as `f64`, or 0.0
/// for anything non-numeric (including non-finite spellings)
pub fn parse_or_zero(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Cell for `key` in `record`, coerced numerically; missing keys are 0.0
pub(crate) fn numeric_cell(record: &Record, key: Option<&str>) -> f64 {
    key.and_then(|k| record.get(k))
        .map(|v| parse_or_zero(v))
        .unwrap_or(0.0)
}

/// Cell for `key` in `record` as text; missing keys are empty
pub(crate) fn text_cell(record: &Record, key: Option<&str>) -> String {
    key.and_then(|k| record.get(k)).cloned().unwrap_or_default()
}

/// Configured color list, if any
pub(crate) fn style_colors(config: &ChartConfig) -> Option<Vec<String>> {
    config.style.as_ref().and_then(|s| s.colors.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ChartConfig;
    use uuid::Uuid;

    fn dashboard(chart_type: &str) -> Dashboard {
        Dashboard::new(Uuid::new_v4(), "test", chart_type, ChartConfig::default())
    }

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(parse_or_zero("10"), 10.0);
        assert_eq!(parse_or_zero(" 2.5 "), 2.5);
        assert_eq!(parse_or_zero("-3"), -3.0);
        assert_eq!(parse_or_zero(""), 0.0);
        assert_eq!(parse_or_zero("abc"), 0.0);
        assert_eq!(parse_or_zero("inf"), 0.0);
        assert_eq!(parse_or_zero("NaN"), 0.0);
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let data = build_chart_data(&dashboard("PIE"), &[], &ChartConfig::default());
        assert!(data.error.is_none());
        assert_eq!(data.chart_type.as_deref(), Some("PIE"));
    }

    #[test]
    fn test_unknown_type_is_a_payload_not_an_error() {
        let data = build_chart_data(&dashboard("Gauge"), &[], &ChartConfig::default());
        assert_eq!(
            data.error.as_deref(),
            Some("Unsupported chart type: gauge")
        );
        assert!(data.datasets.is_empty());
    }
}
