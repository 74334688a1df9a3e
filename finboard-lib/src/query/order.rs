//! Ordering types for server-side row blocks.

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// Specifies the ordering of rows requested from a datasource.
///
/// Multiple columns can be chained for secondary, tertiary, etc. sorting.
///
/// # Example
///
/// ```
/// use finboard_lib::query::OrderBy;
///
/// let order = OrderBy::desc("amount").then_asc("vendor");
/// assert_eq!(order.to_param(), "-amount,vendor");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Creates an ascending order on a column.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on a column.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Desc)],
        }
    }

    /// Adds a secondary ascending order.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    /// Returns the ordered columns with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Encodes the order as an `ordering` parameter value.
    ///
    /// Descending columns are prefixed with `-`.
    pub fn to_param(&self) -> String {
        self.fields
            .iter()
            .map(|(field, direction)| match direction {
                Direction::Asc => field.clone(),
                Direction::Desc => format!("-{}", field),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
