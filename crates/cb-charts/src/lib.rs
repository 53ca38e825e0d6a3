//! Chart-data transformation engine
//!
//! Reshapes materialized CSV records into renderer-ready series payloads,
//! dispatching on the dashboard's chart type: category charts (pie,
//! doughnut, polararea), XY charts (bar, line, radar, optionally grouped
//! into multiple series), and scatter charts (scatter, bubble).

mod builder;
mod category;
mod colors;
mod scatter;
mod xy;

pub use builder::{build_chart_data, parse_or_zero};
pub use colors::{generate_colors, BASE_COLORS, DEFAULT_SCATTER_COLOR, DEFAULT_SERIES_COLOR};
