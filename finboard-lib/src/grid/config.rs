//! Grid configuration

use super::DateFormat;

/// Defaults applied when building columns and rendering cells.
///
/// # Example
///
/// ```
/// use finboard_lib::grid::GridConfig;
///
/// let config = GridConfig::default()
///     .with_min_column_width(200)
///     .with_block_size(50);
/// assert_eq!(config.block_size, 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Minimum width of every column, in pixels.
    ///
    /// Default: 150
    pub min_column_width: u32,

    /// Rows requested per server-side block.
    ///
    /// Default: 100
    pub block_size: usize,

    /// Format used when a date column's configured format is not recognized.
    ///
    /// Default: `ddMMMyyyy`
    pub default_date_format: DateFormat,

    /// Decimal places for round-off columns without an explicit precision.
    ///
    /// Default: 2
    pub default_precision: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_column_width: 150,
            block_size: 100,
            default_date_format: DateFormat::default(),
            default_precision: 2,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_column_width(mut self, width: u32) -> Self {
        self.min_column_width = width;
        self
    }

    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size.max(1);
        self
    }

    pub fn with_default_date_format(mut self, format: DateFormat) -> Self {
        self.default_date_format = format;
        self
    }

    pub fn with_default_precision(mut self, precision: u32) -> Self {
        self.default_precision = precision;
        self
    }
}
