//! Table orchestration
//!
//! A [`Table`] ties column specs to a row source and renders rows for the
//! grid component. Rows come either from memory or from a server-side
//! [`Datasource`] that is asked for one block at a time.

use std::sync::Arc;

use futures::Stream;
use serde::Serialize;

use super::Block;
use super::BlockRequest;
use super::CellContent;
use super::CellRenderer;
use super::ColumnSpec;
use super::Datasource;
use super::GridConfig;
use super::RenderContext;
use crate::error::Error;
use crate::model::Row;
use crate::model::tag::KnownTags;
use crate::query::QueryParams;

/// Where a table's rows come from.
#[derive(Clone)]
pub enum RowSource {
    /// Rows already in memory.
    Static(Vec<Row>),
    /// Rows fetched block by block.
    ServerSide(Arc<dyn Datasource>),
}

/// Emitted when the user clicks a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowClickedEvent {
    /// Position of the row in the grid.
    pub index: usize,
    pub row: Row,
}

/// Callback invoked on row clicks.
pub type RowClickHandler = Arc<dyn Fn(&RowClickedEvent) + Send + Sync>;

/// One rendered grid row, cells in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub cells: Vec<RenderedCell>,
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    pub field: String,
    pub content: CellContent,
}

impl RenderedRow {
    /// Content of the cell for a field.
    pub fn cell(&self, field: &str) -> Option<&CellContent> {
        self.cells
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.content)
    }
}

/// A configured grid instance.
///
/// # Example
///
/// ```
/// use finboard_lib::grid::{ColumnSpec, RowSource, Table};
/// use finboard_lib::model::Row;
///
/// let table = Table::new(
///     vec![ColumnSpec::new("Vendor", "vendor")],
///     RowSource::Static(vec![Row::new().set("vendor", "Acme")]),
/// );
///
/// let rendered = table.render(&[Row::new().set("vendor", "Acme")]);
/// assert_eq!(rendered[0].cell("vendor").and_then(|c| c.as_text()), Some("Acme"));
/// ```
#[derive(Clone)]
pub struct Table {
    columns: Vec<ColumnSpec>,
    source: RowSource,
    config: GridConfig,
    params: QueryParams,
    known_tags: KnownTags,
    on_row_clicked: Option<RowClickHandler>,
}

impl Table {
    pub fn new(columns: Vec<ColumnSpec>, source: RowSource) -> Self {
        Self {
            columns,
            source,
            config: GridConfig::default(),
            params: QueryParams::new(),
            known_tags: KnownTags::default(),
            on_row_clicked: None,
        }
    }

    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the filter parameters sent with every block request.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the tags that exist beyond the rendered rows.
    pub fn with_known_tags(mut self, known: KnownTags) -> Self {
        self.known_tags = known;
        self
    }

    /// Registers the row click callback.
    pub fn on_row_clicked<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RowClickedEvent) + Send + Sync + 'static,
    {
        self.on_row_clicked = Some(Arc::new(handler));
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replaces the columns, e.g. after the display config changed.
    pub fn set_columns(&mut self, columns: Vec<ColumnSpec>) {
        self.columns = columns;
    }

    /// Replaces the filter parameters.
    pub fn set_params(&mut self, params: QueryParams) {
        self.params = params;
    }

    /// Fetches a block of rows.
    ///
    /// Static rows are sliced locally and report their full length as the
    /// row count. Server-side requests carry the table's filter parameters
    /// under the request's own.
    pub async fn get_rows(&self, request: BlockRequest) -> Result<Block, Error> {
        match &self.source {
            RowSource::Static(rows) => {
                let start = request.start_row.min(rows.len());
                let end = request.end_row.clamp(start, rows.len());
                Ok(Block::new(rows[start..end].to_vec()).with_row_count(rows.len()))
            }
            RowSource::ServerSide(datasource) => {
                let mut params = self.params.clone();
                params.merge(&request.params);
                datasource.get_rows(BlockRequest { params, ..request }).await
            }
        }
    }

    /// Streams consecutive blocks of `config.block_size` rows until the row
    /// count is reached or a short block arrives.
    pub fn blocks(&self) -> impl Stream<Item = Result<Block, Error>> + '_ {
        let block_size = self.config.block_size.max(1);
        async_stream::try_stream! {
            let mut start = 0;
            loop {
                let block = self.get_rows(BlockRequest::new(start, start + block_size)).await?;
                let received = block.len();
                let total = block.row_count();
                yield block;

                start += received;
                let exhausted = total.is_some_and(|total| start >= total);
                if received < block_size || exhausted {
                    break;
                }
            }
        }
    }

    /// Renders rows with every column's strategy.
    ///
    /// Tag segments count as existing when another of these rows, or the
    /// known tags, already use them.
    pub fn render(&self, rows: &[Row]) -> Vec<RenderedRow> {
        let mut ctx = RenderContext::new(&self.config).with_known_tags(self.known_tags.clone());
        for column in &self.columns {
            if column.renderer == CellRenderer::Tags {
                ctx.index_tags(&column.field, rows);
            }
        }

        rows.iter()
            .map(|row| RenderedRow {
                cells: self
                    .columns
                    .iter()
                    .map(|column| RenderedCell {
                        field: column.field.clone(),
                        content: column.render(&ctx, row),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Forwards a row click to the registered callback.
    ///
    /// Returns `false` when no callback is registered.
    pub fn row_clicked(&self, index: usize, row: Row) -> bool {
        let Some(handler) = &self.on_row_clicked else {
            return false;
        };
        handler(&RowClickedEvent { index, row });
        true
    }
}
