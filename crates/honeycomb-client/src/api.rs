//! The set of Honeycomb endpoints this crate talks to.
//!
//! The query workflow, the derived analysis operations and the tool layer are all
//! written against [`HoneycombApi`] rather than the concrete client, so they can be
//! exercised with a mock in tests.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-support"))]
use mockall::automock;

use crate::error::HoneycombError;
use crate::query::AnalysisQuery;
use crate::types::{Column, CreatedQuery, Dataset, QueryResult, Slo, Trigger};

/// Single-request operations against the Honeycomb REST API.
///
/// Every method takes the environment name first; implementations must fail with
/// [`HoneycombError::UnknownEnvironment`] for an unregistered name before doing any I/O.
#[cfg_attr(any(test, feature = "test-support"), automock)]
#[async_trait]
pub trait HoneycombApi: Send + Sync {
    /// Names of all configured environments, in registration order.
    fn environment_names(&self) -> Vec<String>;

    /// `GET /1/datasets`
    async fn list_datasets(&self, environment: &str) -> Result<Vec<Dataset>, HoneycombError>;

    /// `GET /1/datasets/{dataset}`
    async fn get_dataset(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Dataset, HoneycombError>;

    /// `GET /1/columns/{dataset}`
    async fn get_columns(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Vec<Column>, HoneycombError>;

    /// `GET /1/columns/{dataset}?key_name={key_name}`
    async fn get_column_by_name(
        &self,
        environment: &str,
        dataset: &str,
        key_name: &str,
    ) -> Result<Column, HoneycombError>;

    /// `POST /1/queries/{dataset}`
    async fn create_query(
        &self,
        environment: &str,
        dataset: &str,
        query: &AnalysisQuery,
    ) -> Result<CreatedQuery, HoneycombError>;

    /// `POST /1/query_results/{dataset}`
    async fn create_query_result(
        &self,
        environment: &str,
        dataset: &str,
        query_id: &str,
    ) -> Result<QueryResult, HoneycombError>;

    /// `GET /1/query_results/{dataset}/{query_result_id}`
    async fn get_query_result(
        &self,
        environment: &str,
        dataset: &str,
        query_result_id: &str,
    ) -> Result<QueryResult, HoneycombError>;

    /// `GET /1/slos/{dataset}`
    async fn get_slos(&self, environment: &str, dataset: &str) -> Result<Vec<Slo>, HoneycombError>;

    /// `GET /1/slos/{dataset}/{slo_id}?detailed=true`
    async fn get_slo(
        &self,
        environment: &str,
        dataset: &str,
        slo_id: &str,
    ) -> Result<Slo, HoneycombError>;

    /// `GET /1/triggers/{dataset}`
    async fn get_triggers(
        &self,
        environment: &str,
        dataset: &str,
    ) -> Result<Vec<Trigger>, HoneycombError>;

    /// `GET /1/triggers/{dataset}/{trigger_id}`
    async fn get_trigger(
        &self,
        environment: &str,
        dataset: &str,
        trigger_id: &str,
    ) -> Result<Trigger, HoneycombError>;
}
