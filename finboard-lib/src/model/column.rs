//! Display-config column descriptors

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// One column of a dataset's display config, as served by the API.
///
/// Descriptors are tolerant by construction: any missing or `null` field
/// decodes to its default so a single bad entry cannot fail the whole
/// display config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Header text shown to the user.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,

    /// Key of the column in each row. Empty when the payload omitted it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub column_name: String,

    /// How values in this column are formatted.
    #[serde(default, deserialize_with = "null_as_default")]
    pub value_format_type: ValueFormatType,

    /// Custom cell component, if any.
    #[serde(default)]
    pub custom_column_type: Option<CustomColumnType>,

    /// Formatting hints.
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: ColumnConfig,
}

impl ColumnDescriptor {
    /// Creates a plain descriptor.
    pub fn new(display_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            column_name: column_name.into(),
            ..Default::default()
        }
    }

    /// Sets the value format type.
    pub fn with_format(mut self, format: ValueFormatType) -> Self {
        self.value_format_type = format;
        self
    }

    /// Marks the column as a custom component.
    pub fn with_custom_type(mut self, custom: CustomColumnType) -> Self {
        self.custom_column_type = Some(custom);
        self
    }

    /// Replaces the formatting hints.
    pub fn with_config(mut self, config: ColumnConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns `true` if the descriptor declares a custom renderer.
    pub fn has_custom_renderer(&self) -> bool {
        self.custom_column_type.is_some() || self.value_format_type != ValueFormatType::Plain
    }
}

/// Formatting hints attached to a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Sibling column holding the currency code for amount columns.
    #[serde(default)]
    pub currency_column: Option<String>,

    /// Display pattern for date columns (e.g. `ddMMMyyyy`).
    #[serde(default)]
    pub date_format: Option<String>,

    /// Static prefix for `PREFIX` columns.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Decimal places for `ROUND_OFF` columns.
    #[serde(default)]
    pub precision: Option<u32>,
}

impl ColumnConfig {
    pub fn currency_column(mut self, column: impl Into<String>) -> Self {
        self.currency_column = Some(column.into());
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }
}

/// Semantic format of the values in a column.
///
/// `Plain` is the default and absorbs any format name this crate does not
/// know, so new server-side formats render verbatim instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueFormatType {
    /// Numeric value rounded to a fixed number of decimals.
    RoundOff,
    /// Date or timestamp.
    DateTime,
    /// Value prefixed with a static string.
    Prefix,
    /// Amount prefixed with the currency found in a sibling column.
    ColumnPrefix,
    /// No special formatting.
    #[default]
    #[serde(other)]
    Plain,
}

/// Custom cell components that also provide an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomColumnType {
    /// Hierarchical tag chips.
    Tag,
}

/// Response body of the display-config endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_config: Vec<ColumnDescriptor>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_descriptor() {
        let json = r#"{
            "display_name": "Amount",
            "column_name": "amount",
            "value_format_type": "COLUMN_PREFIX",
            "config": {"currency_column": "ccy"}
        }"#;
        let d: ColumnDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.value_format_type, ValueFormatType::ColumnPrefix);
        assert_eq!(d.config.currency_column.as_deref(), Some("ccy"));
        assert!(d.has_custom_renderer());
    }

    #[test]
    fn test_unknown_format_is_plain() {
        let d: ColumnDescriptor =
            serde_json::from_str(r#"{"column_name": "x", "value_format_type": "SPARKLINE"}"#).unwrap();
        assert_eq!(d.value_format_type, ValueFormatType::Plain);
        assert!(!d.has_custom_renderer());
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let d: ColumnDescriptor =
            serde_json::from_str(r#"{"display_name": "Memo", "column_name": null, "config": null}"#)
                .unwrap();
        assert_eq!(d.column_name, "");
        assert_eq!(d.config, ColumnConfig::default());
    }

    #[test]
    fn test_tag_custom_type() {
        let d: ColumnDescriptor =
            serde_json::from_str(r#"{"column_name": "tags", "custom_column_type": "TAG"}"#).unwrap();
        assert_eq!(d.custom_column_type, Some(CustomColumnType::Tag));
    }
}
