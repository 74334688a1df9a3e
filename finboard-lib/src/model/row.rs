//! Dynamic grid row

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// A single row of tabular data, keyed by column name.
///
/// Rows are decoded straight from the widget-data JSON objects.
///
/// # Example
///
/// ```
/// use finboard_lib::model::Row;
///
/// let row = Row::new()
///     .set("amount", 120i64)
///     .set("ccy", "usd");
///
/// assert_eq!(row.get_string("ccy").unwrap(), Some("usd"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "string", other.type_name())),
        }
    }

    /// Gets an integer field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets a numeric field as a decimal.
    ///
    /// Integers, floats and numeric strings are all widened.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(other) => other
                .as_decimal()
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "decimal", other.type_name())),
        }
    }

    /// Gets a list field value.
    pub fn get_list(&self, field: &str) -> Result<Option<&[Value]>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::List(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(FieldError::type_mismatch(field, "list", other.type_name())),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_row() {
        let row: Row =
            serde_json::from_str(r#"{"amount": 120, "ccy": "usd", "tags": ["a/b"], "memo": null}"#)
                .unwrap();
        assert_eq!(row.get_int("amount").unwrap(), Some(120));
        assert_eq!(row.get_string("ccy").unwrap(), Some("usd"));
        assert_eq!(row.get_string("memo").unwrap(), None);
        assert_eq!(row.get_list("tags").unwrap().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_typed_getter_errors() {
        let row = Row::new().set("amount", 120i64);
        assert_eq!(row.get_string("missing"), Err(FieldError::missing("missing")));
        assert_eq!(
            row.get_string("amount"),
            Err(FieldError::type_mismatch("amount", "string", "int"))
        );
    }

    #[test]
    fn test_get_decimal_widens() {
        let row = Row::new().set("a", 5i64).set("b", "7.25");
        assert_eq!(row.get_decimal("a").unwrap(), Some(Decimal::from(5)));
        assert_eq!(row.get_decimal("b").unwrap(), Some(Decimal::new(725, 2)));
    }
}
