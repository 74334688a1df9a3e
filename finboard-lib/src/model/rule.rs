//! Rule cards served by the rules API

use serde::Deserialize;
use serde::Serialize;

/// A saved rule with its display value and filter conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleCard {
    /// Display value of the rule (e.g. the tag it applies).
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub filters: RuleFilters,
}

impl RuleCard {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            filters: RuleFilters::default(),
        }
    }

    /// Adds a condition (builder pattern).
    pub fn condition(mut self, condition: Condition) -> Self {
        self.filters.conditions.push(condition);
        self
    }

    /// Returns the rule's conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.filters.conditions
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleFilters {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// One predicate of a rule: a column and the value(s) it is compared to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ConditionColumn,
    #[serde(default)]
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(column: ConditionColumn, value: impl Into<ConditionValue>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Column referenced by a condition, with its user-facing alias.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionColumn {
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl ConditionColumn {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Scalar or array condition value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    List(Vec<String>),
    /// Numbers, booleans and anything else the API sends.
    Other(serde_json::Value),
}

impl ConditionValue {
    /// Returns every comparable text of this value.
    pub fn texts(&self) -> Vec<String> {
        match self {
            ConditionValue::Text(s) => vec![s.clone()],
            ConditionValue::List(items) => items.clone(),
            ConditionValue::Other(serde_json::Value::Null) => Vec::new(),
            ConditionValue::Other(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            ConditionValue::Other(other) => vec![other.to_string()],
        }
    }
}

impl Default for ConditionValue {
    fn default() -> Self {
        ConditionValue::Other(serde_json::Value::Null)
    }
}

impl From<&str> for ConditionValue {
    fn from(v: &str) -> Self {
        ConditionValue::Text(v.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(v: String) -> Self {
        ConditionValue::Text(v)
    }
}

impl From<Vec<&str>> for ConditionValue {
    fn from(v: Vec<&str>) -> Self {
        ConditionValue::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(v: Vec<String>) -> Self {
        ConditionValue::List(v)
    }
}
