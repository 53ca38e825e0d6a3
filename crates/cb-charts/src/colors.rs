//! Series color assignment

/// Fixed palette cycled through by auto-coloring
pub const BASE_COLORS: [&str; 10] = [
    "#4e73df", "#1cc88a", "#36b9cc", "#f6c23e", "#e74a3b", "#858796", "#5a5c69", "#2e59d9",
    "#17a673", "#2c9faf",
];

/// Default color for single-series XY datasets
pub const DEFAULT_SERIES_COLOR: &str = "#4e73df";

/// Default color for scatter/bubble datasets
pub const DEFAULT_SCATTER_COLOR: &str = "#36A2EB";

/// First `count` entries of the palette repeated once.
///
/// Covers up to twice the palette length; asking for more returns that
/// maximum rather than cycling further.
pub fn generate_colors(count: usize) -> Vec<String> {
    BASE_COLORS
        .iter()
        .chain(BASE_COLORS.iter())
        .take(count)
        .map(|c| c.to_string())
        .collect()
}
