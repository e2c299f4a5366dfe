//! Tools for reading service level objectives.

use std::borrow::Cow;

use async_trait::async_trait;
use honeycomb_client::Slo;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::tool_metadata::ToolMetadata;

/// Parameters for the list_slos tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListSlosToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
}

#[derive(Default)]
pub struct ListSlosTool;

impl ToolMetadata for ListSlosTool {
    type LlmParams = ListSlosToolParams;
    type Output = Vec<Slo>;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("list_slos")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed("List the SLOs defined on a Honeycomb dataset.")
    }
}

#[async_trait]
impl SimpleTool for ListSlosTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        ctx.client()
            .get_slos(&llm_params.environment, &llm_params.dataset)
            .await
            .map_err(|e| ToolError::client("list_slos", e))
    }
}

/// Parameters for the get_slo tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetSloToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
    /// SLO id, as returned by list_slos.
    pub slo_id: String,
}

/// Tool for fetching one SLO with its compliance and remaining budget.
#[derive(Default)]
pub struct GetSloTool;

impl ToolMetadata for GetSloTool {
    type LlmParams = GetSloToolParams;
    type Output = Slo;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("get_slo")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "Get one SLO in detail, including current compliance and remaining error budget.",
        )
    }
}

#[async_trait]
impl SimpleTool for GetSloTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        ctx.client()
            .get_slo(
                &llm_params.environment,
                &llm_params.dataset,
                &llm_params.slo_id,
            )
            .await
            .map_err(|e| ToolError::client("get_slo", e))
    }
}
