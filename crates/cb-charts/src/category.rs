//! Category charts: pie, doughnut, polararea
//!
//! Each record becomes its own labeled slice, in record order. No
//! aggregation happens here; duplicate labels stay duplicated.

use cb_core::{ChartConfig, ChartData, ColorValue, Dashboard, Dataset, Record, SeriesData};

use crate::builder::{numeric_cell, style_colors, text_cell};
use crate::colors::generate_colors;

pub(crate) fn build_category_chart(
    dashboard: &Dashboard,
    records: &[Record],
    config: &ChartConfig,
) -> ChartData {
    let label_key = config.label.as_deref();
    let value_key = config.value.as_deref();

    let mut labels = Vec::with_capacity(records.len());
    let mut values = Vec::with_capacity(records.len());

    for record in records {
        labels.push(text_cell(record, label_key));
        values.push(numeric_cell(record, value_key));
    }

    let colors = style_colors(config).unwrap_or_else(|| generate_colors(labels.len()));

    ChartData {
        chart_type: Some(dashboard.chart_type.clone()),
        labels: Some(labels),
        datasets: vec![Dataset {
            label: dashboard.name.clone(),
            data: SeriesData::Values(values),
            background_color: Some(ColorValue::Many(colors)),
            border_color: None,
            fill: None,
        }],
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ChartStyle;
    use uuid::Uuid;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(Uuid::new_v4(), "slices", "pie", ChartConfig::default())
    }

    fn config() -> ChartConfig {
        ChartConfig {
            label: Some("cat".into()),
            value: Some("val".into()),
            ..ChartConfig::default()
        }
    }

    #[test]
    fn test_duplicate_labels_are_not_aggregated() {
        let records = vec![
            record(&[("cat", "A"), ("val", "10")]),
            record(&[("cat", "A"), ("val", "5")]),
        ];

        let data = build_category_chart(&dashboard(), &records, &config());

        assert_eq!(data.labels.unwrap(), vec!["A", "A"]);
        match &data.datasets[0].data {
            SeriesData::Values(values) => assert_eq!(values, &vec![10.0, 5.0]),
            other => panic!("unexpected series shape: {other:?}"),
        }
    }

    #[test]
    fn test_missing_cells_default() {
        let records = vec![record(&[("other", "x")])];
        let data = build_category_chart(&dashboard(), &records, &config());

        assert_eq!(data.labels.unwrap(), vec![""]);
        match &data.datasets[0].data {
            SeriesData::Values(values) => assert_eq!(values, &vec![0.0]),
            other => panic!("unexpected series shape: {other:?}"),
        }
    }

    #[test]
    fn test_auto_colors_sized_to_label_count() {
        let records = vec![
            record(&[("cat", "A"), ("val", "1")]),
            record(&[("cat", "B"), ("val", "2")]),
            record(&[("cat", "C"), ("val", "3")]),
        ];
        let data = build_category_chart(&dashboard(), &records, &config());

        match &data.datasets[0].background_color {
            Some(ColorValue::Many(colors)) => assert_eq!(colors.len(), 3),
            other => panic!("unexpected colors: {other:?}"),
        }
    }

    #[test]
    fn test_configured_colors_win() {
        let mut cfg = config();
        cfg.style = Some(ChartStyle {
            colors: Some(vec!["#000000".into()]),
        });
        let records = vec![record(&[("cat", "A"), ("val", "1")])];
        let data = build_category_chart(&dashboard(), &records, &cfg);

        assert_eq!(
            data.datasets[0].background_color,
            Some(ColorValue::Many(vec!["#000000".into()]))
        );
    }

    #[test]
    fn test_dataset_label_is_dashboard_name() {
        let data = build_category_chart(&dashboard(), &[], &config());
        assert_eq!(data.datasets[0].label, "slices");
    }
}
