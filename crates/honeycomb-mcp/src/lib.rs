//! An MCP server exposing read-only access to Honeycomb over stdio.

use std::path::Path;
use std::sync::Arc;

use honeycomb_tools::{ToolContext, honeycomb_tool_registry};

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod resources;
pub mod server;

pub use config::{Config, ConfigError};
pub use error::ServerError;
pub use server::McpServer;

/// Loads the configuration, builds the client and the tools, then serves MCP over
/// stdio until the client disconnects.
///
/// # Errors
///
/// Fails if any startup step fails or the stdio session breaks.
pub async fn run(config_file: Option<&Path>) -> Result<(), ServerError> {
    let config = Config::load(config_file)?;
    let client = config.build_client()?;
    let environments = client.environments().names().join(", ");
    tracing::info!(%environments, "Configured Honeycomb environments");

    let registry = honeycomb_tool_registry()?;
    let ctx = ToolContext::new(Arc::new(client), config.poll_config);

    tracing::info!("Serving MCP over stdio");
    McpServer::new(registry, ctx).serve_stdio().await
}
