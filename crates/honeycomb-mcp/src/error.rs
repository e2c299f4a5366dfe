use honeycomb_client::HoneycombError;
use honeycomb_tools::ToolError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create Honeycomb client: {0}")]
    Client(#[from] HoneycombError),

    #[error("Failed to set up tools: {0}")]
    Tools(#[from] ToolError),

    #[error("Failed to set up logging: {message}")]
    Observability { message: String },

    #[error("MCP transport error: {message}")]
    Transport { message: String },
}
