use schemars::{JsonSchema, Schema, schema_for};
use serde::{Serialize, de::DeserializeOwned};
use std::borrow::Cow;

use crate::error::ToolResult;

/// Metadata every tool exposes to the assistant: a name, a description and the
/// JSON Schema of its parameters.
///
/// # Example
///
/// ```ignore
/// use honeycomb_tools::ToolMetadata;
/// use schemars::JsonSchema;
/// use serde::{Deserialize, Serialize};
/// use std::borrow::Cow;
///
/// #[derive(Serialize, Deserialize, JsonSchema)]
/// struct EchoParams {
///     text: String,
/// }
///
/// #[derive(Default)]
/// struct EchoTool;
///
/// impl ToolMetadata for EchoTool {
///     type LlmParams = EchoParams;
///     type Output = String;
///
///     fn name(&self) -> Cow<'static, str> {
///         Cow::Borrowed("echo")
///     }
///
///     fn description(&self) -> Cow<'static, str> {
///         Cow::Borrowed("Echo the input back")
///     }
///     // parameters_schema() is derived from LlmParams
/// }
/// ```
pub trait ToolMetadata: Send + Sync + 'static {
    /// The parameter type the assistant fills in.
    type LlmParams: Serialize + DeserializeOwned + JsonSchema + Send + Sync + 'static;

    /// The JSON-serializable result.
    type Output: Serialize + Send + 'static;

    /// Unique name, used for registration and invocation.
    fn name(&self) -> Cow<'static, str>;

    fn description(&self) -> Cow<'static, str>;

    /// JSON Schema for [`Self::LlmParams`].
    fn parameters_schema(&self) -> ToolResult<Schema> {
        Ok(schema_for!(Self::LlmParams))
    }
}
