//! Honeycomb REST API client.
//!
//! This crate provides a typed client for the Honeycomb API across several named
//! environments, plus the submit-and-poll query workflow and a few analysis helpers
//! built on top of it.
//!
//! # Example
//!
//! ```no_run
//! use honeycomb_client::{
//!     AnalysisQueryParams, CalculationOp, Environment, HoneycombApi, HoneycombClient,
//! };
//!
//! # async fn example() -> Result<(), honeycomb_client::HoneycombError> {
//! let client = HoneycombClient::builder()
//!     .environment(Environment::new("prod", "your-api-key"))
//!     .build()?;
//!
//! let datasets = client.list_datasets("prod").await?;
//! println!("{} datasets", datasets.len());
//!
//! let mut params = AnalysisQueryParams::new(CalculationOp::P99);
//! params.column = Some("duration_ms".to_string());
//! let result = client.run_analysis_query("prod", "web-logs", params).await?;
//! println!("{} rows", result.results.len());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
mod api;
mod client;
mod environment;
mod error;
pub mod query;
mod types;
pub mod workflow;

pub use analysis::{AnalysisQueryParams, AnalysisResult, ColumnAnalysis};
#[cfg(any(test, feature = "test-support"))]
pub use api::MockHoneycombApi;
pub use api::HoneycombApi;
pub use client::{API_KEY_HEADER, HoneycombClient, HoneycombClientBuilder, RequestOptions};
pub use environment::{DEFAULT_BASE_URL, Environment, EnvironmentRegistry, default_base_url};
pub use error::HoneycombError;
pub use query::{
    AnalysisQuery, Calculation, CalculationOp, Filter, FilterCombination, FilterOp, Having,
    HavingOp, Order, OrderDirection,
};
pub use types::{
    Column, ColumnType, CreatedQuery, Dataset, QueryResult, QueryResultData, QueryResultLinks,
    QueryResultRow, Slo, Trigger,
};
pub use workflow::{PollConfig, query_and_wait_for_results};
