//! Tools that run queries through the submit-and-poll workflow.

use std::borrow::Cow;

use async_trait::async_trait;
use honeycomb_client::{
    AnalysisQuery, AnalysisQueryParams, AnalysisResult, CalculationOp, Filter, analysis,
    query_and_wait_for_results,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::tool_metadata::ToolMetadata;

/// Parameters for the run_query tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RunQueryToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
    /// The query specification.
    pub query: AnalysisQuery,
}

/// Tool for running an arbitrary analysis query.
///
/// The query is checked locally before it is submitted, so mistakes come back as
/// readable errors instead of API rejections.
#[derive(Default)]
pub struct RunQueryTool;

impl ToolMetadata for RunQueryTool {
    type LlmParams = RunQueryToolParams;
    type Output = AnalysisResult;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("run_query")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "Run a Honeycomb query with any combination of calculations, breakdowns, filters, \
             orders, havings and a time window, and wait for the results. \
             COUNT and CONCURRENCY take no column; every other calculation needs one. \
             Orders may only reference calculations in the query or breakdown columns.",
        )
    }
}

#[async_trait]
impl SimpleTool for RunQueryTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        let RunQueryToolParams {
            environment,
            dataset,
            query,
        } = llm_params;

        query
            .validate()
            .map_err(|e| ToolError::client("run_query", e))?;
        query_and_wait_for_results(
            ctx.client(),
            &environment,
            &dataset,
            &query,
            ctx.poll_config(),
        )
        .await
        .map(AnalysisResult::from)
        .map_err(|e| ToolError::client("run_query", e))
    }
}

/// Parameters for the run_analysis_query tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RunAnalysisQueryToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
    /// The aggregation to compute.
    pub calculation: CalculationOp,
    /// Column to aggregate. Required for every calculation except COUNT and CONCURRENCY.
    #[serde(default)]
    pub column: Option<String>,
    /// Columns to group by.
    #[serde(default)]
    pub breakdowns: Option<Vec<String>>,
    /// A single filter to apply.
    #[serde(default)]
    pub filter: Option<Filter>,
    /// Relative time window in seconds. Defaults to one hour.
    #[serde(default)]
    pub time_range: Option<u64>,
}

impl From<RunAnalysisQueryToolParams> for AnalysisQueryParams {
    fn from(params: RunAnalysisQueryToolParams) -> Self {
        Self {
            calculation: params.calculation,
            column: params.column,
            breakdowns: params.breakdowns,
            filter: params.filter,
            time_range: params.time_range,
        }
    }
}

/// Tool for a single-calculation query with optional grouping and filtering.
#[derive(Default)]
pub struct RunAnalysisQueryTool;

impl ToolMetadata for RunAnalysisQueryTool {
    type LlmParams = RunAnalysisQueryToolParams;
    type Output = AnalysisResult;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("run_analysis_query")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "Compute one calculation (e.g. COUNT, AVG, P99) over a Honeycomb dataset, \
             optionally grouped by breakdown columns and narrowed by one filter. \
             Covers the last hour unless time_range (seconds) is given.",
        )
    }
}

#[async_trait]
impl SimpleTool for RunAnalysisQueryTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        let environment = llm_params.environment.clone();
        let dataset = llm_params.dataset.clone();
        analysis::run_analysis_query(
            ctx.client(),
            &environment,
            &dataset,
            llm_params.into(),
            ctx.poll_config(),
        )
        .await
        .map_err(|e| ToolError::client("run_analysis_query", e))
    }
}
