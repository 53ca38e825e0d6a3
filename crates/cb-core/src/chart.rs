//! Chart configuration and payload shapes
//!
//! The configuration arrives as a persisted JSON column on a dashboard;
//! the payload is handed to a chart.js-style renderer as a JSON body, so
//! field casing follows that convention (`backgroundColor`, `borderColor`).

use serde::{Deserialize, Serialize};

/// Declarative chart configuration.
///
/// Which keys are meaningful depends on the chart family: category charts
/// read `label`/`value`, XY charts read `x`/`y`/`group_by`, scatter charts
/// read `x`/`y`/`r`. Unknown keys are ignored on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Column holding slice labels (category family)
    pub label: Option<String>,
    /// Column holding slice magnitudes (category family)
    pub value: Option<String>,
    /// Column for the x axis (XY and scatter families)
    pub x: Option<String>,
    /// Column for the y axis (XY and scatter families)
    pub y: Option<String>,
    /// Column for bubble radius; points default to radius 5 when absent
    pub r: Option<String>,
    /// Column that splits rows into one series per distinct value
    pub group_by: Option<String>,
    /// Optional styling overrides
    pub style: Option<ChartStyle>,
}

/// Styling overrides carried inside a chart configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Ordered color list; when absent, colors are auto-generated
    pub colors: Option<Vec<String>>,
}

/// Renderer-ready chart payload.
///
/// An unsupported chart type is not an error at this layer: it comes back
/// as a payload carrying only `error`, so the caller can render a friendly
/// message instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<Dataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartData {
    /// Payload reporting an unrecognized chart type
    pub fn unsupported(chart_type: &str) -> Self {
        Self {
            error: Some(format!("Unsupported chart type: {chart_type}")),
            ..Self::default()
        }
    }
}

/// One rendered series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub label: String,
    pub data: SeriesData,
    #[serde(rename = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorValue>,
    #[serde(rename = "borderColor", skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            label: String::new(),
            data: SeriesData::Values(Vec::new()),
            background_color: None,
            border_color: None,
            fill: None,
        }
    }
}

/// Series data: scalars for category/XY charts, points for scatter charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<f64>),
    Points(Vec<ScatterPoint>),
}

/// A scatter/bubble point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Background color: a single color for one-series charts, a per-slice
/// list for category charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    Many(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_from_persisted_json() {
        let config: ChartConfig = serde_json::from_str(
            r##"{"x": "month", "y": "sales", "group_by": "region",
                "style": {"colors": ["#111111"]}}"##,
        )
        .unwrap();
        assert_eq!(config.x.as_deref(), Some("month"));
        assert_eq!(config.group_by.as_deref(), Some("region"));
        assert_eq!(
            config.style.unwrap().colors.unwrap(),
            vec!["#111111".to_string()]
        );
        assert!(config.label.is_none());
    }

    #[test]
    fn test_payload_uses_chartjs_casing() {
        let data = ChartData {
            chart_type: Some("bar".into()),
            labels: Some(vec!["a".into()]),
            datasets: vec![Dataset {
                label: "series".into(),
                data: SeriesData::Values(vec![1.0]),
                background_color: Some(ColorValue::Single("#4e73df".into())),
                border_color: Some("#4e73df".into()),
                fill: Some(false),
            }],
            error: None,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["datasets"][0]["backgroundColor"], "#4e73df");
        assert_eq!(json["datasets"][0]["borderColor"], "#4e73df");
        assert_eq!(json["datasets"][0]["fill"], false);
    }

    #[test]
    fn test_unsupported_payload_carries_only_error() {
        let data = ChartData::unsupported("gauge");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["error"], "Unsupported chart type: gauge");
        assert!(json.get("type").is_none());
        assert!(json.get("labels").is_none());
        assert!(json.get("datasets").is_none());
    }

    #[test]
    fn test_scatter_point_shape() {
        let point = ScatterPoint { x: 1.0, y: 2.0, r: 5.0 };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1.0, "y": 2.0, "r": 5.0}));
    }
}
