//! XY charts: bar, line, radar
//!
//! Ungrouped: one series, labels straight from the x column in record
//! order. Grouped: one series per distinct `group_by` value in encounter
//! order, aligned to the union of x values; a recurring (group, x) pair
//! keeps the later row's y.

use indexmap::IndexMap;

use cb_core::{ChartConfig, ChartData, ColorValue, Dashboard, Dataset, Record, SeriesData};

use crate::builder::{numeric_cell, style_colors, text_cell};
use crate::colors::{generate_colors, DEFAULT_SERIES_COLOR};

pub(crate) fn build_xy_chart(
    dashboard: &Dashboard,
    records: &[Record],
    config: &ChartConfig,
) -> ChartData {
    let x_key = config.x.as_deref();
    let y_key = config.y.as_deref();

    let (labels, datasets) = match config.group_by.as_deref() {
        Some(group_key) => build_grouped(dashboard, records, x_key, y_key, group_key),
        None => build_ungrouped(dashboard, records, x_key, y_key, config),
    };

    ChartData {
        chart_type: Some(dashboard.chart_type.clone()),
        labels: Some(labels),
        datasets,
        error: None,
    }
}

fn build_grouped(
    dashboard: &Dashboard,
    records: &[Record],
    x_key: Option<&str>,
    y_key: Option<&str>,
    group_key: &str,
) -> (Vec<String>, Vec<Dataset>) {
    let mut grouped: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
    let mut labels: Vec<String> = Vec::new();

    for record in records {
        let group = record
            .get(group_key)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let x = text_cell(record, x_key);
        let y = numeric_cell(record, y_key);

        if !labels.contains(&x) {
            labels.push(x.clone());
        }
        grouped.entry(group).or_default().insert(x, y);
    }

    let colors = generate_colors(grouped.len());
    // Filling with true everywhere except actual line charts keeps bars
    // and radars solid; the comparison is against the stored type verbatim.
    let fill = dashboard.chart_type != "line";

    let datasets = grouped
        .into_iter()
        .enumerate()
        .map(|(i, (group, series))| {
            let data: Vec<f64> = labels
                .iter()
                .map(|label| series.get(label).copied().unwrap_or(0.0))
                .collect();
            let color = colors.get(i).cloned();

            Dataset {
                label: group,
                data: SeriesData::Values(data),
                background_color: color.clone().map(ColorValue::Single),
                border_color: color,
                fill: Some(fill),
            }
        })
        .collect();

    (labels, datasets)
}

fn build_ungrouped(
    dashboard: &Dashboard,
    records: &[Record],
    x_key: Option<&str>,
    y_key: Option<&str>,
    config: &ChartConfig,
) -> (Vec<String>, Vec<Dataset>) {
    let mut labels = Vec::with_capacity(records.len());
    let mut values = Vec::with_capacity(records.len());

    for record in records {
        labels.push(text_cell(record, x_key));
        values.push(numeric_cell(record, y_key));
    }

    let color = style_colors(config)
        .and_then(|colors| colors.into_iter().next())
        .unwrap_or_else(|| DEFAULT_SERIES_COLOR.to_string());

    let dataset = Dataset {
        label: dashboard.name.clone(),
        data: SeriesData::Values(values),
        background_color: Some(ColorValue::Single(color.clone())),
        border_color: Some(color),
        fill: None,
    };

    (labels, vec![dataset])
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dashboard(chart_type: &str) -> Dashboard {
        Dashboard::new(Uuid::new_v4(), "series", chart_type, ChartConfig::default())
    }

    fn grouped_config() -> ChartConfig {
        ChartConfig {
            x: Some("x".into()),
            y: Some("y".into()),
            group_by: Some("g".into()),
            ..ChartConfig::default()
        }
    }

    fn values(dataset: &Dataset) -> Vec<f64> {
        match &dataset.data {
            SeriesData::Values(values) => values.clone(),
            other => panic!("unexpected series shape: {other:?}"),
        }
    }

    #[test]
    fn test_grouped_series_align_to_shared_labels() {
        let records = vec![
            record(&[("g", "A"), ("x", "1"), ("y", "10")]),
            record(&[("g", "B"), ("x", "1"), ("y", "20")]),
            record(&[("g", "A"), ("x", "2"), ("y", "30")]),
        ];

        let data = build_xy_chart(&dashboard("bar"), &records, &grouped_config());

        assert_eq!(data.labels.unwrap(), vec!["1", "2"]);
        assert_eq!(data.datasets.len(), 2);
        assert_eq!(data.datasets[0].label, "A");
        assert_eq!(values(&data.datasets[0]), vec![10.0, 30.0]);
        assert_eq!(data.datasets[1].label, "B");
        // B never saw x=2, so that slot zero-fills.
        assert_eq!(values(&data.datasets[1]), vec![20.0, 0.0]);
    }

    #[test]
    fn test_grouped_duplicate_pair_keeps_last_value() {
        let records = vec![
            record(&[("g", "A"), ("x", "1"), ("y", "10")]),
            record(&[("g", "A"), ("x", "1"), ("y", "99")]),
        ];

        let data = build_xy_chart(&dashboard("bar"), &records, &grouped_config());
        assert_eq!(values(&data.datasets[0]), vec![99.0]);
    }

    #[test]
    fn test_labels_follow_row_visiting_order() {
        let records = vec![
            record(&[("g", "A"), ("x", "1"), ("y", "1")]),
            record(&[("g", "B"), ("x", "2"), ("y", "2")]),
            record(&[("g", "A"), ("x", "3"), ("y", "3")]),
        ];

        let data = build_xy_chart(&dashboard("bar"), &records, &grouped_config());
        assert_eq!(data.labels.unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_missing_group_cell_lands_in_unknown() {
        let records = vec![record(&[("x", "1"), ("y", "5")])];
        let data = build_xy_chart(&dashboard("bar"), &records, &grouped_config());
        assert_eq!(data.datasets[0].label, "Unknown");
    }

    #[test]
    fn test_fill_is_false_only_for_line() {
        let records = vec![record(&[("g", "A"), ("x", "1"), ("y", "1")])];

        let line = build_xy_chart(&dashboard("line"), &records, &grouped_config());
        assert_eq!(line.datasets[0].fill, Some(false));

        let bar = build_xy_chart(&dashboard("bar"), &records, &grouped_config());
        assert_eq!(bar.datasets[0].fill, Some(true));

        let radar = build_xy_chart(&dashboard("radar"), &records, &grouped_config());
        assert_eq!(radar.datasets[0].fill, Some(true));
    }

    #[test]
    fn test_grouped_colors_assigned_by_encounter_order() {
        let records = vec![
            record(&[("g", "A"), ("x", "1"), ("y", "1")]),
            record(&[("g", "B"), ("x", "1"), ("y", "2")]),
        ];

        let data = build_xy_chart(&dashboard("bar"), &records, &grouped_config());
        let expected = generate_colors(2);
        assert_eq!(
            data.datasets[0].background_color,
            Some(ColorValue::Single(expected[0].clone()))
        );
        assert_eq!(data.datasets[1].border_color.as_deref(), Some(expected[1].as_str()));
    }

    #[test]
    fn test_ungrouped_keeps_record_order_and_duplicates() {
        let config = ChartConfig {
            x: Some("x".into()),
            y: Some("y".into()),
            ..ChartConfig::default()
        };
        let records = vec![
            record(&[("x", "jan"), ("y", "3")]),
            record(&[("x", "jan"), ("y", "4")]),
            record(&[("x", "feb"), ("y", "bad")]),
        ];

        let data = build_xy_chart(&dashboard("bar"), &records, &config);

        assert_eq!(data.labels.unwrap(), vec!["jan", "jan", "feb"]);
        assert_eq!(data.datasets.len(), 1);
        assert_eq!(data.datasets[0].label, "series");
        assert_eq!(values(&data.datasets[0]), vec![3.0, 4.0, 0.0]);
        assert_eq!(
            data.datasets[0].background_color,
            Some(ColorValue::Single(DEFAULT_SERIES_COLOR.to_string()))
        );
        assert_eq!(data.datasets[0].fill, None);
    }

    #[test]
    fn test_ungrouped_uses_first_configured_color() {
        let config = ChartConfig {
            x: Some("x".into()),
            y: Some("y".into()),
            style: Some(cb_core::ChartStyle {
                colors: Some(vec!["#abcdef".into(), "#123456".into()]),
            }),
            ..ChartConfig::default()
        };
        let records = vec![record(&[("x", "a"), ("y", "1")])];

        let data = build_xy_chart(&dashboard("line"), &records, &config);
        assert_eq!(data.datasets[0].border_color.as_deref(), Some("#abcdef"));
    }
}
