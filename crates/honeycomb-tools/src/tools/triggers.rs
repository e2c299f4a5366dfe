//! Tools for reading alert triggers.

use std::borrow::Cow;

use async_trait::async_trait;
use honeycomb_client::Trigger;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::tool_metadata::ToolMetadata;

/// Parameters for the list_triggers tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListTriggersToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
}

#[derive(Default)]
pub struct ListTriggersTool;

impl ToolMetadata for ListTriggersTool {
    type LlmParams = ListTriggersToolParams;
    type Output = Vec<Trigger>;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("list_triggers")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(
            "List the triggers (alerts) on a Honeycomb dataset and whether each is firing.",
        )
    }
}

#[async_trait]
impl SimpleTool for ListTriggersTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        ctx.client()
            .get_triggers(&llm_params.environment, &llm_params.dataset)
            .await
            .map_err(|e| ToolError::client("list_triggers", e))
    }
}

/// Parameters for the get_trigger tool (visible to LLM).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetTriggerToolParams {
    /// Name of the configured Honeycomb environment.
    pub environment: String,
    /// Dataset slug.
    pub dataset: String,
    /// Trigger id, as returned by list_triggers.
    pub trigger_id: String,
}

#[derive(Default)]
pub struct GetTriggerTool;

impl ToolMetadata for GetTriggerTool {
    type LlmParams = GetTriggerToolParams;
    type Output = Trigger;

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("get_trigger")
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed("Get one trigger's full definition, thresholds and recipients.")
    }
}

#[async_trait]
impl SimpleTool for GetTriggerTool {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output> {
        ctx.client()
            .get_trigger(
                &llm_params.environment,
                &llm_params.dataset,
                &llm_params.trigger_id,
            )
            .await
            .map_err(|e| ToolError::client("get_trigger", e))
    }
}
