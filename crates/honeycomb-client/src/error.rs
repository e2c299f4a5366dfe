//! Error types for the Honeycomb client.

use thiserror::Error;

/// Errors that can occur when using the Honeycomb client.
#[derive(Error, Debug)]
pub enum HoneycombError {
    /// The requested environment is not present in the registry.
    #[error("Unknown environment: {name}")]
    UnknownEnvironment { name: String },

    /// Non-success HTTP status returned by the API.
    #[error("Honeycomb API error: {status_code} {status_text}")]
    Api {
        status_code: u16,
        status_text: String,
    },

    /// The query result never reported `complete` within the poll budget.
    #[error("Query timed out waiting for results ({query_result_id} after {attempts} attempts)")]
    QueryTimeout {
        query_result_id: String,
        attempts: u32,
    },

    /// Any failure while running a generic analysis query.
    #[error("Analysis query failed: {message}")]
    AnalysisQueryFailed { message: String },

    /// Any failure while analyzing a single column.
    #[error("Column analysis failed: {message}")]
    ColumnAnalysisFailed { message: String },

    /// The query was rejected locally before being submitted.
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Error making the HTTP request.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response at `{path}`: {message}")]
    Deserialize { path: String, message: String },

    /// Error serializing a request body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API key cannot be sent as an HTTP header value.
    #[error("Invalid API key for environment `{environment}`: it must be visible ASCII without line breaks")]
    InvalidApiKey { environment: String },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}

impl From<url::ParseError> for HoneycombError {
    fn from(e: url::ParseError) -> Self {
        HoneycombError::InvalidUrl(e.to_string())
    }
}

impl HoneycombError {
    /// Returns the HTTP status code when this error came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HoneycombError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
