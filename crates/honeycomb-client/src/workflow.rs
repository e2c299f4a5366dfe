//! Submit-and-poll workflow for Honeycomb queries.
//!
//! Honeycomb computes query results asynchronously: a query is created, then a query
//! result handle is created for it, and the handle is polled until it reports
//! `complete`. [`query_and_wait_for_results`] hides this behind one call with a fixed
//! attempt budget and a fixed delay between attempts.

use std::time::Duration;

use crate::api::HoneycombApi;
use crate::error::HoneycombError;
use crate::query::AnalysisQuery;
use crate::types::QueryResult;

pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling budget for [`query_and_wait_for_results`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Creates a query, creates a result handle for it, and polls the handle.
///
/// Returns the first poll response with `complete: true`. Every incomplete poll is
/// followed by a sleep of `poll.interval`; after `poll.max_attempts` incomplete polls the
/// call fails with [`HoneycombError::QueryTimeout`]. Errors from any individual request
/// are returned immediately without retrying.
pub async fn query_and_wait_for_results<A: HoneycombApi + ?Sized>(
    api: &A,
    environment: &str,
    dataset: &str,
    query: &AnalysisQuery,
    poll: &PollConfig,
) -> Result<QueryResult, HoneycombError> {
    let created = api.create_query(environment, dataset, query).await?;
    tracing::debug!(environment, dataset, query_id = %created.id, "Created query");

    let handle = api
        .create_query_result(environment, dataset, &created.id)
        .await?;
    tracing::debug!(
        environment,
        dataset,
        query_result_id = %handle.id,
        "Created query result"
    );

    for attempt in 1..=poll.max_attempts {
        let result = api.get_query_result(environment, dataset, &handle.id).await?;
        if result.complete {
            tracing::debug!(query_result_id = %handle.id, attempt, "Query result complete");
            return Ok(result);
        }
        tracing::debug!(query_result_id = %handle.id, attempt, "Query result not complete yet");
        tokio::time::sleep(poll.interval).await;
    }

    tracing::warn!(
        environment,
        dataset,
        query_result_id = %handle.id,
        attempts = poll.max_attempts,
        "Timed out waiting for query results"
    );
    Err(HoneycombError::QueryTimeout {
        query_result_id: handle.id,
        attempts: poll.max_attempts,
    })
}
