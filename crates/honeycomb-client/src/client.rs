//! Honeycomb API client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::analysis::{self, AnalysisQueryParams, AnalysisResult, ColumnAnalysis};
use crate::api::HoneycombApi;
use crate::environment::{Environment, EnvironmentRegistry};
use crate::error::HoneycombError;
use crate::query::AnalysisQuery;
use crate::types::{
    Column, CreateQueryResultRequest, CreatedQuery, Dataset, QueryResult, Slo, Trigger,
};
use crate::workflow::{self, PollConfig};

/// Header carrying the environment's API key.
pub const API_KEY_HEADER: &str = "x-honeycomb-team";

// =============================================================================
// Request Options
// =============================================================================

/// Per-request options for [`HoneycombClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Appended to the URL in order, URL-encoded.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

// =============================================================================
// Client Builder
// =============================================================================

/// Builder for creating a [`HoneycombClient`].
#[derive(Default)]
pub struct HoneycombClientBuilder {
    environments: Vec<Environment>,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    poll_config: PollConfig,
}

impl HoneycombClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an environment. The first registration of a name wins.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environments.push(environment);
        self
    }

    /// Registers several environments.
    pub fn environments(mut self, environments: impl IntoIterator<Item = Environment>) -> Self {
        self.environments.extend(environments);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a new client will be created.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets a per-request timeout. There is none by default.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Overrides the query polling budget.
    pub fn poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    /// Builds the [`HoneycombClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No environment was registered
    /// - An environment's API key is not a valid header value
    /// - The HTTP client cannot be built
    pub fn build(self) -> Result<HoneycombClient, HoneycombError> {
        if self.environments.is_empty() {
            return Err(HoneycombError::MissingConfig("environments"));
        }
        for environment in &self.environments {
            environment.api_key_header()?;
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(HoneycombError::Request)?
            }
        };

        Ok(HoneycombClient {
            http_client,
            environments: Arc::new(EnvironmentRegistry::new(self.environments)),
            poll_config: self.poll_config,
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the Honeycomb REST API across one or more environments.
///
/// Cloning is cheap: the connection pool and the environment registry are shared.
#[derive(Clone)]
pub struct HoneycombClient {
    http_client: reqwest::Client,
    environments: Arc<EnvironmentRegistry>,
    poll_config: PollConfig,
}

impl fmt::Debug for HoneycombClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoneycombClient")
            .field("environments", &self.environments.names())
            .field("poll_config", &self.poll_config)
            .finish_non_exhaustive()
    }
}

impl HoneycombClient {
    /// Creates a new builder for constructing a [`HoneycombClient`].
    pub fn builder() -> HoneycombClientBuilder {
        HoneycombClientBuilder::new()
    }

    pub fn environments(&self) -> &EnvironmentRegistry {
        &self.environments
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll_config
    }

    /// Performs one authenticated request and decodes the JSON body.
    ///
    /// `path` is a list of raw segments; each one is percent-encoded and appended to the
    /// environment's base URL.
    ///
    /// # Errors
    ///
    /// - [`HoneycombError::UnknownEnvironment`] before any I/O if `environment` is not registered
    /// - [`HoneycombError::Api`] for a non-2xx status
    /// - [`HoneycombError::Request`] for transport failures
    /// - [`HoneycombError::Deserialize`] if the body does not decode as `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        environment: &str,
        path: &[&str],
        options: RequestOptions,
    ) -> Result<T, HoneycombError> {
        let environment = self.environments.get(environment)?;
        let url = build_url(environment.base_url(), path, &options.query)?;

        tracing::debug!(
            environment = environment.name(),
            method = %options.method,
            path = url.path(),
            "Sending Honeycomb API request"
        );

        let mut request = self
            .http_client
            .request(options.method, url)
            .headers(options.headers)
            .headers(Self::auth_headers(environment)?);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        let bytes = response.bytes().await?;
        decode(&bytes)
    }

    // -------------------------------------------------------------------------
    // Derived operations
    // -------------------------------------------------------------------------

    /// Submits a query and polls until its result is complete.
    ///
    /// See [`workflow::query_and_wait_for_results`].
    pub async fn query_and_wait_for_results(
        &self,
        environment: &str,
        dataset: &str,
        query: &AnalysisQuery,
    ) -> Result<QueryResult, HoneycombError> {
        workflow::query_and_wait_for_results(self, environment, dataset, query, &self.poll_config)
            .await
    }

    /// See [`analysis::run_analysis_query`].
    pub async fn run_analysis_query(
        &self,
        environment: &str,
        dataset: &str,
        params: AnalysisQueryParams,
    ) -> Result<AnalysisResult, HoneycombError> {
        analysis::run_analysis_query(self, environment, dataset, params, &self.poll_config).await
    }

    /// See [`analysis::analyze_column`].
    pub async fn analyze_column(
        &self,
        environment: &str,
        dataset: &str,
        column: &str,
        time_range: Option<u64>,
    ) -> Result<ColumnAnalysis, HoneycombError> {
        analysis::analyze_column(
            self,
            environment,
            dataset,
            column,
            time_range,
            &self.poll_config,
        )
        .await
    }

    /// See [`analysis::get_visible_columns`].
    pub async fn get_visible_columns(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Vec<Column>, HoneycombError> {
        analysis::get_visible_columns(self, environment, dataset).await
    }

    // -------------------------------------------------------------------------
    // Helper Methods
    // -------------------------------------------------------------------------

    /// Creates the authentication and content-type headers for an environment.
    fn auth_headers(environment: &Environment) -> Result<HeaderMap, HoneycombError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            environment.api_key_header()?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Checks the response status, turning anything outside 2xx into [`HoneycombError::Api`].
    async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, HoneycombError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<Could not read response body>: {e}"));
        tracing::debug!(status = status.as_u16(), body = %body, "Honeycomb API returned an error");

        Err(HoneycombError::Api {
            status_code: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        })
    }
}

fn build_url(
    base_url: &Url,
    path: &[&str],
    query: &[(String, String)],
) -> Result<Url, HoneycombError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| HoneycombError::InvalidUrl(format!("`{base_url}` cannot be a base URL")))?
        .pop_if_empty()
        .extend(path);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HoneycombError> {
    let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(deserializer).map_err(|e| HoneycombError::Deserialize {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

#[async_trait]
impl HoneycombApi for HoneycombClient {
    fn environment_names(&self) -> Vec<String> {
        self.environments
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    async fn list_datasets(&self, environment: &str) -> Result<Vec<Dataset>, HoneycombError> {
        self.request(environment, &["1", "datasets"], RequestOptions::get())
            .await
    }

    async fn get_dataset(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Dataset, HoneycombError> {
        self.request(environment, &["1", "datasets", dataset], RequestOptions::get())
            .await
    }

    async fn get_columns(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Vec<Column>, HoneycombError> {
        self.request(environment, &["1", "columns", dataset], RequestOptions::get())
            .await
    }

    async fn get_column_by_name(
        &self,
        environment: &str,
        dataset: &str,
        key_name: &str,
    ) -> Result<Column, HoneycombError> {
        self.request(
            environment,
            &["1", "columns", dataset],
            RequestOptions::get().with_query("key_name", key_name),
        )
        .await
    }

    async fn create_query(
        &self,
        environment: &str,
        dataset: &str,
        query: &AnalysisQuery,
    ) -> Result<CreatedQuery, HoneycombError> {
        let body = serde_json::to_value(query)?;
        self.request(
            environment,
            &["1", "queries", dataset],
            RequestOptions::post(body),
        )
        .await
    }

    async fn create_query_result(
        &self,
        environment: &str,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult, HoneycombError> {
        let body = serde_json::to_value(CreateQueryResultRequest {
            query_id: query_id.to_string(),
            disable_series: false,
        })?;
        self.request(
            environment,
            &["1", "query_results", dataset],
            RequestOptions::post(body),
        )
        .await
    }

    async fn get_query_result(
        &self,
        environment: &str,
        dataset: &str,
        query_result_id: &str,
    ) -> Result<QueryResult, HoneycombError> {
        self.request(
            environment,
            &["1", "query_results", dataset, query_result_id],
            RequestOptions::get(),
        )
        .await
    }

    async fn get_slos(&self, environment: &str, dataset: &str) -> Result<Vec<Slo>, HoneycombError> {
        self.request(environment, &["1", "slos", dataset], RequestOptions::get())
            .await
    }

    async fn get_slo(
        &self,
        environment: &str,
        dataset: &str,
        slo_id: &str,
    ) -> Result<Slo, HoneycombError> {
        self.request(
            environment,
            &["1", "slos", dataset, slo_id],
            RequestOptions::get().with_query("detailed", "true"),
        )
        .await
    }

    async fn get_triggers(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Vec<Trigger>, HoneycombError> {
        self.request(environment, &["1", "triggers", dataset], RequestOptions::get())
            .await
    }

    async fn get_trigger(
        &self,
        environment: &str,
        dataset: &str,
        trigger_id: &str,
    ) -> Result<Trigger, HoneycombError> {
        self.request(
            environment,
            &["1", "triggers", dataset, trigger_id],
            RequestOptions::get(),
        )
        .await
    }
}
