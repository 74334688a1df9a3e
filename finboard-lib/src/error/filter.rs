//! Filter model errors

/// Errors raised by the filter board before any query is built.
///
/// Range ordering and allowed-value membership are not checked here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The value shape does not match the filter type.
    #[error("Filter '{key}' expects a {expected} value, got {actual}")]
    ValueShape {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// No filter with this key is registered.
    #[error("Unknown filter '{key}'")]
    Unknown { key: String },

    /// The filter is a single select with clearing disabled.
    #[error("Filter '{key}' does not allow clearing")]
    ClearForbidden { key: String },

    /// Two active filters sharing a widget would constrain the same parameter.
    #[error("Filter '{key}' conflicts with active filter '{other}' on parameter '{param}'")]
    Conflict {
        key: String,
        other: String,
        param: String,
    },

    /// Two descriptors were registered under the same key.
    #[error("Duplicate filter key '{key}'")]
    DuplicateKey { key: String },
}

impl FilterError {
    pub fn value_shape(key: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::ValueShape {
            key: key.into(),
            expected,
            actual,
        }
    }

    pub fn unknown(key: impl Into<String>) -> Self {
        Self::Unknown { key: key.into() }
    }
}
