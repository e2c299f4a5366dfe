use honeycomb_client::HoneycombError;
use thiserror::Error;

pub type ToolResult<T> = Result<T, ToolError>;

/// Errors raised while registering, describing or executing tools and prompts.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("A tool with the name '{name}' is already registered")]
    DuplicateTool { name: String },

    #[error("Unknown prompt: {name}")]
    UnknownPrompt { name: String },

    /// The arguments did not match the tool's parameter type.
    #[error("Invalid parameters for `{tool}` at `{path}`: {message}")]
    InvalidParameters {
        tool: String,
        path: String,
        message: String,
    },

    #[error("Failed to generate parameter schema: {message}")]
    SchemaGeneration { message: String },

    #[error("Failed to serialize tool output: {message}")]
    Serialization { message: String },

    /// The Honeycomb call behind a tool failed.
    #[error("{tool} failed: {source}")]
    Client {
        tool: String,
        #[source]
        source: HoneycombError,
    },
}

impl ToolError {
    pub fn client(tool: impl Into<String>, source: HoneycombError) -> Self {
        Self::Client {
            tool: tool.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
