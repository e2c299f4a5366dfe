//! Tool for profiling a single column.

use std::borrow::Cow;

use async_trait::async_trait;
use honeycomb_client::{ColumnAnalysis, analysis};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::summary::{ColumnSummary, summarize_column};
use crate::tool_metadata::ToolMetadata;

/// Parameters for the analyze_column tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeColumnToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
    /// Exact key name of the column.
    pub column: String,
    /// Relative time window in seconds. Defaults to one hour.
    #[serde(default)]
    pub time_range: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeColumnToolOutput {
    pub summary: ColumnSummary,
    #[serde(flatten)]
    pub analysis: ColumnAnalysis,
}

/// Tool for summarizing a column's value distribution.
///
/// Reports the ten most frequent values with their share of events and, for numeric
/// columns, min, max and average.
#[derive(Default)]
pub struct AnalyzeColumnTool;

impl ToolMetadata for AnalyzeColumnTool {
    type LlmParams = AnalyzeColumnToolParams;
    type Output = AnalyzeColumnToolOutput;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("analyze_column")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "Summarize one column of a Honeycomb dataset: its most frequent values with their \
             share of events, plus AVG, P95, MIN and MAX for numeric columns.",
        )
    }
}

#[async_trait]
impl SimpleTool for AnalyzeColumnTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        let analysis = analysis::analyze_column(
            ctx.client(),
            &llm_params.environment,
            &llm_params.dataset,
            &llm_params.column,
            llm_params.time_range,
            ctx.poll_config(),
        )
        .await
        .map_err(|e| ToolError::client("analyze_column", e))?;

        Ok(AnalyzeColumnToolOutput {
            summary: summarize_column(&analysis),
            analysis,
        })
    }
}
