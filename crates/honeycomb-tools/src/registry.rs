use async_trait::async_trait;
use schemars::Schema;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ToolContext;
use crate::error::{ToolError, ToolResult};
use crate::simple_tool::SimpleTool;
use crate::tool_metadata::ToolMetadata;

/// Type-erased tool trait for registry storage and dynamic execution.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> Cow<'static, str>;

    fn description(&self) -> Cow<'static, str>;

    fn parameters_schema(&self) -> ToolResult<Schema>;

    /// Execute the tool with untyped JSON arguments.
    ///
    /// `null` arguments are treated as an empty object.
    async fn execute_erased(
        &self,
        llm_params: JsonValue,
        ctx: &ToolContext,
    ) -> ToolResult<JsonValue>;
}

/// Blanket implementation of [`ErasedTool`] for all `SimpleTool` types.
#[async_trait]
impl<T: SimpleTool> ErasedTool for T {
    fn name(&self) -> Cow<'static, str> {
        ToolMetadata::name(self)
    }

    fn description(&self) -> Cow<'static, str> {
        ToolMetadata::description(self)
    }

    fn parameters_schema(&self) -> ToolResult<Schema> {
        ToolMetadata::parameters_schema(self)
    }

    async fn execute_erased(
        &self,
        llm_params: JsonValue,
        ctx: &ToolContext,
    ) -> ToolResult<JsonValue> {
        let llm_params = if llm_params.is_null() {
            JsonValue::Object(Map::new())
        } else {
            llm_params
        };
        let typed_llm_params: T::LlmParams =
            serde_path_to_error::deserialize(llm_params).map_err(|e| {
                ToolError::InvalidParameters {
                    tool: ToolMetadata::name(self).into_owned(),
                    path: e.path().to_string(),
                    message: e.inner().to_string(),
                }
            })?;

        let output = self.execute(typed_llm_params, ctx).await?;

        Ok(serde_json::to_value(&output)?)
    }
}

/// How a tool is advertised to the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: JsonValue,
}

/// A registry of tools, looked up and invoked by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool type.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateTool`] if the name is already taken.
    pub fn register<T: SimpleTool + Default>(&mut self) -> ToolResult<&mut Self> {
        let tool = T::default();
        let name = ToolMetadata::name(&tool).into_owned();
        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateTool { name });
        }
        self.tools.insert(name, Arc::new(tool));
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn ErasedTool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted.
    pub fn list_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions for every registered tool, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if a tool's parameter schema cannot be generated.
    pub fn definitions(&self) -> ToolResult<Vec<ToolDefinition>> {
        self.list_tools()
            .into_iter()
            .filter_map(|name| self.get(name))
            .map(|tool| {
                Ok(ToolDefinition {
                    name: tool.name().into_owned(),
                    description: tool.description().into_owned(),
                    input_schema: tool.parameters_schema()?.to_value(),
                })
            })
            .collect()
    }

    /// Look up a tool by name and run it.
    ///
    /// # Errors
    ///
    /// - [`ToolError::UnknownTool`] if nothing is registered under `name`
    /// - [`ToolError::InvalidParameters`] if `llm_params` does not fit the tool
    /// - whatever the tool itself returns
    pub async fn execute(
        &self,
        name: &str,
        llm_params: JsonValue,
        ctx: &ToolContext,
    ) -> ToolResult<JsonValue> {
        let tool = self.get(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;
        tracing::info!(tool = name, "Executing tool");
        let result = tool.execute_erased(llm_params, ctx).await;
        if let Err(e) = &result {
            tracing::warn!(tool = name, error = %e, "Tool execution failed");
        }
        result
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
