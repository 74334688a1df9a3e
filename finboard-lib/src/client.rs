//! Main DashboardClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::error::Error;
use crate::grid::Block;
use crate::grid::BlockRequest;
use crate::model::ColumnDescriptor;
use crate::model::DisplayConfig;
use crate::model::Row;
use crate::model::RuleCard;
use crate::query::QueryParams;

/// Client for the dashboard data API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// # Example
///
/// ```ignore
/// use finboard_lib::DashboardClient;
///
/// let client = DashboardClient::builder()
///     .url("https://dash.example.com")
///     .token("session-token")
///     .build()?;
///
/// let columns = client.display_config("payments").await?;
/// ```
#[derive(Clone)]
pub struct DashboardClient {
    inner: Arc<DashboardClientInner>,
}

struct DashboardClientInner {
    base_url: Url,
    api_version: String,
    token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl DashboardClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> DashboardClientBuilder<Missing> {
        DashboardClientBuilder::new()
    }

    /// Returns the base URL of the dashboard API.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the API version being used.
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// Fetches the column descriptors of a dataset.
    pub async fn display_config(&self, dataset_id: &str) -> Result<Vec<ColumnDescriptor>, Error> {
        let url = self.endpoint(&["datasets", dataset_id, "display-config"], &QueryParams::new())?;
        let config: DisplayConfig = self.get_json(url).await?;
        Ok(config.display_config)
    }

    /// Fetches every row of a widget under the given filter parameters.
    pub async fn widget_data(&self, widget_id: &str, params: &QueryParams) -> Result<Vec<Row>, Error> {
        let url = self.endpoint(&["widgets", widget_id, "data"], params)?;
        let data: WidgetData = self.get_json(url).await?;
        Ok(data.into_block().into_rows())
    }

    /// Fetches one block of a widget's rows.
    pub async fn widget_block(&self, widget_id: &str, request: &BlockRequest) -> Result<Block, Error> {
        let url = self.endpoint(&["widgets", widget_id, "data"], &request.to_params())?;
        let data: WidgetData = self.get_json(url).await?;
        Ok(data.into_block())
    }

    /// Fetches the rule cards.
    pub async fn rules(&self) -> Result<Vec<RuleCard>, Error> {
        let url = self.endpoint(&["rules"], &QueryParams::new())?;
        self.get_json(url).await
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn endpoint(&self, segments: &[&str], params: &QueryParams) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?;
            path.pop_if_empty()
                .push("api")
                .push(&self.inner.api_version)
                .extend(segments);
        }
        params.append_to(&mut url);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        log::debug!("GET {}", url);

        let mut request = self.inner.http_client.get(url.clone());
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            log::warn!("GET {} failed with {}", url, status);
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ApiError::http(status.as_u16(), message).into());
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => Err(ApiError::parse_with_body(e.to_string(), body).into()),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        }
    }
}

/// Widget data arrives as a bare row array, or as a block when a row
/// range was requested.
#[derive(Deserialize)]
#[serde(untagged)]
enum WidgetData {
    Block(Block),
    Rows(Vec<Row>),
}

impl WidgetData {
    fn into_block(self) -> Block {
        match self {
            WidgetData::Block(block) => block,
            WidgetData::Rows(rows) => Block::new(rows),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`DashboardClient`].
///
/// Uses the typestate pattern to ensure the URL is set at compile time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use finboard_lib::DashboardClient;
///
/// let client = DashboardClient::builder()
///     .url("https://dash.example.com")
///     .api_version("v2")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// assert_eq!(client.api_version(), "v2");
/// # Ok::<(), finboard_lib::error::ApiError>(())
/// ```
pub struct DashboardClientBuilder<U> {
    url: U,
    api_version: String,
    token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl DashboardClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            api_version: "v1".to_string(),
            token: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the dashboard API base URL.
    pub fn url(self, url: impl Into<String>) -> DashboardClientBuilder<Set<String>> {
        DashboardClientBuilder {
            url: Set(url.into()),
            api_version: self.api_version,
            token: self.token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for DashboardClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> DashboardClientBuilder<U> {
    /// Sets the API version to use.
    ///
    /// Defaults to `v1`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl DashboardClientBuilder<Set<String>> {
    /// Builds the [`DashboardClient`].
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be created.
    pub fn build(self) -> Result<DashboardClient, ApiError> {
        let base_url = Url::parse(self.url.0.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.url.0));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(DashboardClient {
            inner: Arc::new(DashboardClientInner {
                base_url,
                api_version: self.api_version,
                token: self.token.filter(|t| !t.is_empty()),
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
