//! Declarative filter descriptions and their values.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// Kind of a filter; decides the value shape and the predicate it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKind {
    Search,
    MultiSelect,
    SingleSelect,
    DateRange,
    AmountRange,
    Tags,
    ArraySearch,
}

impl FilterKind {
    /// Name of the value shape this kind accepts.
    pub fn expected_shape(&self) -> &'static str {
        match self {
            FilterKind::Search | FilterKind::SingleSelect => "text",
            FilterKind::MultiSelect | FilterKind::ArraySearch => "list",
            FilterKind::DateRange => "date_range",
            FilterKind::AmountRange => "amount_range",
            FilterKind::Tags => "tag",
        }
    }
}

/// Whether a date filter picks a range or a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateMode {
    #[default]
    Range,
    Single,
}

/// A dataset column a filter constrains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterTarget {
    pub dataset_id: String,
    pub column: String,
}

impl FilterTarget {
    pub fn new(dataset_id: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            column: column.into(),
        }
    }
}

/// A user-facing filter and the columns it fans out to.
///
/// # Example
///
/// ```
/// use finboard_lib::filter::{FilterDescriptor, FilterKind, FilterTarget};
///
/// let amount = FilterDescriptor::new("amount", "Amount", FilterKind::AmountRange)
///     .target(FilterTarget::new("payments", "amount"))
///     .target(FilterTarget::new("invoices", "total"))
///     .widget("w-payments")
///     .widget("w-invoices");
///
/// assert_eq!(amount.targets.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Unique per filter instance.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// Allowed values for select filters.
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub datatype: String,
    /// Widgets refetched when the value changes.
    #[serde(default)]
    pub widgets_in_scope: Vec<String>,
    #[serde(default)]
    pub targets: Vec<FilterTarget>,
    #[serde(default = "default_allow_clear")]
    pub allow_clear: bool,
    /// Debounce in milliseconds; none means refetch immediately.
    #[serde(default)]
    pub debounce_time: Option<u64>,
    #[serde(default)]
    pub date_mode: DateMode,
}

fn default_allow_clear() -> bool {
    true
}

impl FilterDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            values: Vec::new(),
            datatype: String::new(),
            widgets_in_scope: Vec::new(),
            targets: Vec::new(),
            allow_clear: true,
            debounce_time: None,
            date_mode: DateMode::Range,
        }
    }

    /// Adds a target column.
    pub fn target(mut self, target: FilterTarget) -> Self {
        self.targets.push(target);
        self
    }

    /// Adds a widget to the refetch scope.
    pub fn widget(mut self, widget_id: impl Into<String>) -> Self {
        self.widgets_in_scope.push(widget_id.into());
        self
    }

    /// Sets the allowed values.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_clear(mut self, allow: bool) -> Self {
        self.allow_clear = allow;
        self
    }

    pub fn debounce(mut self, millis: u64) -> Self {
        self.debounce_time = Some(millis);
        self
    }

    pub fn date_mode(mut self, mode: DateMode) -> Self {
        self.date_mode = mode;
        self
    }

    /// Debounce as a duration.
    pub fn debounce_duration(&self) -> Option<Duration> {
        self.debounce_time.map(Duration::from_millis)
    }

    /// Returns `true` if changing this filter should refetch the widget.
    pub fn is_in_scope(&self, widget_id: &str) -> bool {
        self.widgets_in_scope.iter().any(|w| w == widget_id)
    }
}

/// Inclusive date range as sent by the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self { start_date, end_date }
    }

    /// A range covering a single day.
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }
}

/// Inclusive amount range; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    #[serde(default)]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub max: Option<Decimal>,
}

impl AmountRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// The current value of a filter.
///
/// The shape must match the descriptor's [`FilterKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
    DateRange(DateRange),
    AmountRange(AmountRange),
    Tag(String),
}

impl FilterValue {
    pub fn shape_name(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::List(_) => "list",
            FilterValue::DateRange(_) => "date_range",
            FilterValue::AmountRange(_) => "amount_range",
            FilterValue::Tag(_) => "tag",
        }
    }

    /// Returns `true` if the value selects nothing and should clear the filter.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) | FilterValue::Tag(s) => s.trim().is_empty(),
            FilterValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            FilterValue::DateRange(_) => false,
            FilterValue::AmountRange(range) => range.is_open(),
        }
    }

    /// Returns `true` if this value fits the given filter kind.
    pub fn fits(&self, kind: FilterKind) -> bool {
        matches!(
            (kind, self),
            (FilterKind::Search | FilterKind::SingleSelect, FilterValue::Text(_))
                | (FilterKind::MultiSelect | FilterKind::ArraySearch, FilterValue::List(_))
                | (FilterKind::DateRange, FilterValue::DateRange(_))
                | (FilterKind::AmountRange, FilterValue::AmountRange(_))
                | (FilterKind::Tags, FilterValue::Tag(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_descriptor() {
        let json = r#"{
            "key": "status",
            "label": "Status",
            "type": "SINGLE_SELECT",
            "values": ["paid", "pending"],
            "datatype": "string",
            "widgetsInScope": ["w1"],
            "targets": [{"dataset_id": "payments", "column": "status"}],
            "allowClear": false,
            "debounceTime": 300
        }"#;
        let d: FilterDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.kind, FilterKind::SingleSelect);
        assert!(!d.allow_clear);
        assert_eq!(d.debounce_duration(), Some(Duration::from_millis(300)));
        assert_eq!(d.date_mode, DateMode::Range);
        assert!(d.is_in_scope("w1"));
    }

    #[test]
    fn test_allow_clear_defaults_true() {
        let d: FilterDescriptor =
            serde_json::from_str(r#"{"key": "q", "label": "Search", "type": "SEARCH"}"#).unwrap();
        assert!(d.allow_clear);
        assert!(d.targets.is_empty());
    }

    #[test]
    fn test_value_fits_kind() {
        assert!(FilterValue::Text("x".into()).fits(FilterKind::Search));
        assert!(!FilterValue::Text("x".into()).fits(FilterKind::MultiSelect));
        assert!(FilterValue::Tag("a/b".into()).fits(FilterKind::Tags));
        assert!(!FilterValue::List(vec![]).fits(FilterKind::Tags));
    }

    #[test]
    fn test_empty_values() {
        assert!(FilterValue::Text("  ".into()).is_empty());
        assert!(FilterValue::List(vec![]).is_empty());
        assert!(FilterValue::AmountRange(AmountRange::default()).is_empty());
        assert!(!FilterValue::AmountRange(AmountRange::new(Some(Decimal::ONE), None)).is_empty());
    }
}
