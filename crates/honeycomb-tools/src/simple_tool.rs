use async_trait::async_trait;

use crate::context::ToolContext;
use crate::error::ToolResult;
use crate::tool_metadata::ToolMetadata;

/// A tool that runs to completion in a single call against the Honeycomb API.
///
/// `SimpleTool` extends [`ToolMetadata`], so implementors provide both. Once
/// registered in a [`ToolRegistry`](crate::ToolRegistry) the tool can be invoked by
/// name with untyped JSON arguments.
///
/// # Example
///
/// ```ignore
/// use honeycomb_tools::{SimpleTool, ToolContext, ToolError, ToolMetadata, ToolResult};
///
/// #[async_trait::async_trait]
/// impl SimpleTool for ListDatasetsTool {
///     async fn execute(
///         &self,
///         llm_params: <Self as ToolMetadata>::LlmParams,
///         ctx: &ToolContext,
///     ) -> ToolResult<<Self as ToolMetadata>::Output> {
///         ctx.client()
///             .list_datasets(&llm_params.environment)
///             .await
///             .map_err(|e| ToolError::client("list_datasets", e))
///     }
/// }
/// ```
#[async_trait]
pub trait SimpleTool: ToolMetadata {
    async fn execute(
        &self,
        llm_params: <Self as ToolMetadata>::LlmParams,
        ctx: &ToolContext,
    ) -> ToolResult<<Self as ToolMetadata>::Output>;
}
