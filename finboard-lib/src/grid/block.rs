//! Block requests and results for server-side row models.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::query::OrderBy;
use crate::query::QueryParams;

/// A half-open row range `[start_row, end_row)` requested by the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRequest {
    pub start_row: usize,
    pub end_row: usize,
    pub sort: Option<OrderBy>,
    /// Filter parameters merged into the request.
    pub params: QueryParams,
}

impl BlockRequest {
    pub fn new(start_row: usize, end_row: usize) -> Self {
        Self {
            start_row,
            end_row: end_row.max(start_row),
            sort: None,
            params: QueryParams::new(),
        }
    }

    /// Sets the sort order.
    pub fn with_sort(mut self, sort: OrderBy) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Merges extra query parameters; later values win.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params.merge(&params);
        self
    }

    /// Number of rows requested.
    pub fn len(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Query parameters for the widget-data endpoint.
    pub fn to_params(&self) -> QueryParams {
        let mut params = self.params.clone();
        params.insert("start_row", self.start_row.to_string());
        params.insert("end_row", self.end_row.to_string());
        if let Some(sort) = self.sort.as_ref().filter(|s| !s.fields().is_empty()) {
            params.insert("ordering", sort.to_param());
        }
        params
    }
}

/// A block of rows with the total row count, when known.
///
/// # Example
///
/// ```
/// use finboard_lib::grid::Block;
/// use finboard_lib::model::Row;
///
/// let block = Block::new(vec![Row::new(), Row::new()]).with_row_count(40);
/// assert_eq!(block.len(), 2);
/// assert_eq!(block.row_count(), Some(40));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    rows: Vec<Row>,
    #[serde(default)]
    row_count: Option<usize>,
}

impl Block {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            row_count: None,
        }
    }

    /// Sets the total row count.
    pub fn with_row_count(mut self, count: usize) -> Self {
        self.row_count = Some(count);
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the block and returns the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Total rows across all blocks, if the source reported it.
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_params() {
        let mut filters = QueryParams::new();
        filters.insert("payments.ccy__exact", "EUR");
        let request = BlockRequest::new(100, 200)
            .with_sort(OrderBy::desc("amount"))
            .with_params(filters);

        let params = request.to_params();
        assert_eq!(params.get("start_row"), Some("100"));
        assert_eq!(params.get("end_row"), Some("200"));
        assert_eq!(params.get("ordering"), Some("-amount"));
        assert_eq!(params.get("payments.ccy__exact"), Some("EUR"));
        assert_eq!(request.len(), 100);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(BlockRequest::new(10, 5).is_empty());
    }

    #[test]
    fn test_decode_block() {
        let block: Block = serde_json::from_str(r#"{"rows": [{"a": 1}], "rowCount": 7}"#).unwrap();
        assert_eq!(block.len(), 1);
        assert_eq!(block.row_count(), Some(7));
    }
}
