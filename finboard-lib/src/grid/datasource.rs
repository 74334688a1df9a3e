//! Server-side datasources

use async_trait::async_trait;

use super::Block;
use super::BlockRequest;
use crate::client::DashboardClient;
use crate::error::Error;
use crate::query::QueryParams;

/// Supplies rows to a server-side grid, one block at a time.
#[async_trait]
pub trait Datasource: Send + Sync {
    /// Fetches the rows in `[request.start_row, request.end_row)`.
    async fn get_rows(&self, request: BlockRequest) -> Result<Block, Error>;
}

/// Datasource backed by a widget's data endpoint.
///
/// The base parameters (usually the widget's active filters) are merged
/// under the parameters of each request.
#[derive(Clone)]
pub struct WidgetDatasource {
    client: DashboardClient,
    widget_id: String,
    base_params: QueryParams,
}

impl WidgetDatasource {
    pub fn new(client: DashboardClient, widget_id: impl Into<String>) -> Self {
        Self {
            client,
            widget_id: widget_id.into(),
            base_params: QueryParams::new(),
        }
    }

    /// Sets the parameters sent with every block request.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.base_params = params;
        self
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }
}

#[async_trait]
impl Datasource for WidgetDatasource {
    async fn get_rows(&self, request: BlockRequest) -> Result<Block, Error> {
        let mut params = self.base_params.clone();
        params.merge(&request.params);
        let request = BlockRequest { params, ..request };

        log::debug!(
            "widget '{}' block {}..{}",
            self.widget_id,
            request.start_row,
            request.end_row
        );
        self.client.widget_block(&self.widget_id, &request).await
    }
}
