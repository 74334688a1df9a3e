//! Cell renderer registry.
//!
//! Every renderer returns `Result<CellContent, RenderDegradation>`. The error
//! side is not a failure: it names why the happy path did not apply and
//! carries the text to show instead, so a cell is never blanked.

use std::collections::HashMap;

use serde::Serialize;

use super::DateFormat;
use super::GridConfig;
use super::format;
use crate::model::ColumnConfig;
use crate::model::Row;
use crate::model::Value;
use crate::model::ValueFormatType;
use crate::model::tag;
use crate::model::tag::KnownTags;
use crate::model::tag::TagChip;
use crate::model::tag::TagIndex;

/// What a grid cell displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellContent {
    /// Plain text.
    Text(String),
    /// One chip per tag segment.
    Chips(Vec<TagChip>),
    /// Loading placeholder.
    Skeleton,
}

impl CellContent {
    pub fn text(text: impl Into<String>) -> Self {
        CellContent::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellContent::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flattens the content for text-only surfaces.
    pub fn to_plain(&self) -> String {
        match self {
            CellContent::Text(s) => s.clone(),
            CellContent::Chips(chips) => chips
                .iter()
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
            CellContent::Skeleton => "…".to_string(),
        }
    }
}

/// Why a renderer fell back to the raw value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderDegradation {
    /// The cell holds no value.
    #[error("cell is empty")]
    Empty,

    /// The value could not be parsed as a date.
    #[error("'{raw}' is not a valid date")]
    InvalidDate { raw: String },

    /// The currency column is not configured or empty on this row.
    #[error("no currency for amount '{raw}'")]
    MissingCurrency { column: Option<String>, raw: String },

    /// A prefix column has no prefix configured.
    #[error("no prefix configured for '{raw}'")]
    MissingPrefix { raw: String },

    /// A numeric format received a non-numeric value.
    #[error("'{raw}' is not numeric")]
    NotNumeric { raw: String },
}

impl RenderDegradation {
    /// The content to display in place of the formatted value.
    pub fn fallback(&self) -> CellContent {
        match self {
            RenderDegradation::Empty => CellContent::Text(String::new()),
            RenderDegradation::InvalidDate { raw }
            | RenderDegradation::MissingCurrency { raw, .. }
            | RenderDegradation::MissingPrefix { raw }
            | RenderDegradation::NotNumeric { raw } => CellContent::Text(raw.clone()),
        }
    }
}

/// Shared inputs for rendering one batch of rows.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    default_date_format: DateFormat,
    default_precision: u32,
    known_tags: KnownTags,
    tag_indexes: HashMap<String, TagIndex>,
}

impl RenderContext {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            default_date_format: config.default_date_format,
            default_precision: config.default_precision,
            known_tags: KnownTags::default(),
            tag_indexes: HashMap::new(),
        }
    }

    /// Tags that exist system-wide, e.g. from the tag options endpoint.
    pub fn with_known_tags(mut self, known: KnownTags) -> Self {
        self.known_tags = known;
        self
    }

    /// Indexes a tag column over the rows about to be rendered.
    pub fn index_tags(&mut self, column: &str, rows: &[Row]) {
        self.tag_indexes
            .insert(column.to_string(), TagIndex::from_rows(rows, column));
    }

    fn is_existing_segment(&self, column: &str, segment: &str) -> bool {
        self.known_tags.contains_segment(segment)
            || self
                .tag_indexes
                .get(column)
                .is_some_and(|index| index.used_elsewhere(segment))
    }
}

/// Renders a value with the registry entry for its format.
pub fn render_format(
    format: ValueFormatType,
    config: &ColumnConfig,
    ctx: &RenderContext,
    row: &Row,
    raw: &Value,
) -> Result<CellContent, RenderDegradation> {
    if raw.is_blank() {
        return Err(RenderDegradation::Empty);
    }
    match format {
        ValueFormatType::RoundOff => render_round_off(config, ctx, raw),
        ValueFormatType::DateTime => render_date_time(config, ctx, raw),
        ValueFormatType::Prefix => render_prefix(config, raw),
        ValueFormatType::ColumnPrefix => render_amount(config, row, raw),
        ValueFormatType::Plain => Ok(CellContent::Text(raw.to_string())),
    }
}

/// Prefixes an amount with the upper-cased currency from a sibling column.
pub fn render_amount(
    config: &ColumnConfig,
    row: &Row,
    raw: &Value,
) -> Result<CellContent, RenderDegradation> {
    let amount = raw.to_string();
    let currency = config
        .currency_column
        .as_deref()
        .and_then(|column| row.get(column))
        .map(|value| value.to_string().trim().to_uppercase())
        .filter(|ccy| !ccy.is_empty());

    match currency {
        Some(ccy) => Ok(CellContent::Text(format!("{} {}", ccy, amount))),
        None => Err(RenderDegradation::MissingCurrency {
            column: config.currency_column.clone(),
            raw: amount,
        }),
    }
}

/// Prefixes the value with the configured static prefix.
pub fn render_prefix(config: &ColumnConfig, raw: &Value) -> Result<CellContent, RenderDegradation> {
    let text = raw.to_string();
    match config.prefix.as_deref().filter(|p| !p.is_empty()) {
        Some(prefix) => Ok(CellContent::Text(format!("{}{}", prefix, text))),
        None => Err(RenderDegradation::MissingPrefix { raw: text }),
    }
}

/// Rounds a numeric value to the configured precision.
pub fn render_round_off(
    config: &ColumnConfig,
    ctx: &RenderContext,
    raw: &Value,
) -> Result<CellContent, RenderDegradation> {
    let precision = config.precision.unwrap_or(ctx.default_precision);
    match raw.as_decimal() {
        Some(value) => Ok(CellContent::Text(format::round_off(value, precision))),
        None => Err(RenderDegradation::NotNumeric {
            raw: raw.to_string(),
        }),
    }
}

/// Formats a date with the configured pattern.
///
/// Patterns outside the allow-list fall back to the default format; values
/// that do not parse pass through unchanged.
pub fn render_date_time(
    config: &ColumnConfig,
    ctx: &RenderContext,
    raw: &Value,
) -> Result<CellContent, RenderDegradation> {
    let text = raw.to_string();
    let Some(parsed) = format::parse_date_time(&text) else {
        return Err(RenderDegradation::InvalidDate { raw: text });
    };

    let date_format = match config.date_format.as_deref() {
        None => ctx.default_date_format,
        Some(pattern) => DateFormat::from_pattern(pattern).unwrap_or_else(|| {
            log::trace!("unsupported date format '{}', using default", pattern);
            ctx.default_date_format
        }),
    };
    Ok(CellContent::Text(date_format.format(&parsed)))
}

/// Renders every segment of every tag path as a chip.
///
/// Segments already in use elsewhere render uncolored.
pub fn render_tags(
    ctx: &RenderContext,
    column: &str,
    raw: &Value,
) -> Result<CellContent, RenderDegradation> {
    let paths = tag::paths_in(raw);
    if paths.is_empty() {
        return Err(RenderDegradation::Empty);
    }

    let chips = paths
        .into_iter()
        .flat_map(tag::segments)
        .map(|segment| {
            if ctx.is_existing_segment(column, segment) {
                TagChip::existing(segment)
            } else {
                TagChip::new_tag(segment)
            }
        })
        .collect();
    Ok(CellContent::Chips(chips))
}
