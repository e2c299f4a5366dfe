//! Tool for listing a dataset's columns.

use std::borrow::Cow;

use async_trait::async_trait;
use honeycomb_client::{Column, analysis};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::tool_metadata::ToolMetadata;

/// Parameters for the get_columns tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetColumnsToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
    /// Also return columns marked hidden.
    #[serde(default)]
    pub include_hidden: bool,
}

/// Tool for listing the columns of a dataset.
///
/// Hidden columns are left out unless `include_hidden` is set.
#[derive(Default)]
pub struct GetColumnsTool;

impl ToolMetadata for GetColumnsTool {
    type LlmParams = GetColumnsToolParams;
    type Output = Vec<Column>;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("get_columns")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "List the columns of a Honeycomb dataset with their types. \
             Use the key names as calculation columns, breakdowns and filters in queries.",
        )
    }
}

#[async_trait]
impl SimpleTool for GetColumnsTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        let GetColumnsToolParams {
            environment,
            dataset,
            include_hidden,
        } = llm_params;

        let columns = if include_hidden {
            ctx.client().get_columns(&environment, &dataset).await
        } else {
            analysis::get_visible_columns(ctx.client(), &environment, &dataset).await
        };
        columns.map_err(|e| ToolError::client("get_columns", e))
    }
}
