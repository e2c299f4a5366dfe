//! Tools for discovering datasets.

use std::borrow::Cow;

use async_trait::async_trait;
use honeycomb_client::Dataset;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::tool_metadata::ToolMetadata;

/// Parameters for the list_datasets tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListDatasetsToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
}

/// Tool for listing the datasets of an environment.
#[derive(Default)]
pub struct ListDatasetsTool;

impl ToolMetadata for ListDatasetsTool {
    type LlmParams = ListDatasetsToolParams;
    type Output = Vec<Dataset>;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("list_datasets")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "List the datasets in a Honeycomb environment. \
             Use this first to discover dataset slugs for the other tools.",
        )
    }
}

#[async_trait]
impl SimpleTool for ListDatasetsTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        ctx.client()
            .list_datasets(&llm_params.environment)
            .await
            .map_err(|e| ToolError::client("list_datasets", e))
    }
}

/// Parameters for the get_dataset tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetDatasetToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
}

/// Tool for fetching one dataset's metadata.
#[derive(Default)]
pub struct GetDatasetTool;

impl ToolMetadata for GetDatasetTool {
    type LlmParams = GetDatasetToolParams;
    type Output = Dataset;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("get_dataset")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed("Get a Honeycomb dataset's metadata by slug.")
    }
}

#[async_trait]
impl SimpleTool for GetDatasetTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        ctx.client()
            .get_dataset(&llm_params.environment, &llm_params.dataset)
            .await
            .map_err(|e| ToolError::client("get_dataset", e))
    }
}
