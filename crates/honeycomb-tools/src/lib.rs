//! Honeycomb tools for AI assistants.
//!
//! Each tool pairs a `schemars`-described parameter struct with one operation of
//! [`honeycomb_client`]. Tools are registered in a [`ToolRegistry`] and invoked by name
//! with JSON arguments, which are validated against the parameter type before anything
//! is sent to Honeycomb.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use honeycomb_client::{Environment, HoneycombClient};
//! use honeycomb_tools::{ToolContext, honeycomb_tool_registry};
//!
//! let client = HoneycombClient::builder()
//!     .environment(Environment::new("prod", "your-api-key"))
//!     .build()?;
//! let ctx = ToolContext::new(Arc::new(client.clone()), *client.poll_config());
//! let registry = honeycomb_tool_registry()?;
//!
//! let datasets = registry
//!     .execute("list_datasets", serde_json::json!({"environment": "prod"}), &ctx)
//!     .await?;
//! ```

mod context;
mod error;
pub mod prompts;
mod registry;
mod simple_tool;
pub mod summary;
mod tool_metadata;
pub mod tools;

pub use context::ToolContext;
pub use error::{ToolError, ToolResult};
pub use registry::{ErasedTool, ToolDefinition, ToolRegistry};
pub use simple_tool::SimpleTool;
pub use tool_metadata::ToolMetadata;
pub use tools::{honeycomb_tool_registry, register_honeycomb_tools};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export schemars for parameter schemas
pub use schemars;
