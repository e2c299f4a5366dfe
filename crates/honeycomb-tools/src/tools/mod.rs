//! The Honeycomb tool set.

mod analyze_column;
mod columns;
mod datasets;
mod query;
mod slos;
mod triggers;

pub use analyze_column::{AnalyzeColumnTool, AnalyzeColumnToolOutput, AnalyzeColumnToolParams};
pub use columns::{GetColumnsTool, GetColumnsToolParams};
pub use datasets::{GetDatasetTool, GetDatasetToolParams, ListDatasetsTool, ListDatasetsToolParams};
pub use query::{RunAnalysisQueryTool, RunAnalysisQueryToolParams, RunQueryTool, RunQueryToolParams};
pub use slos::{GetSloTool, GetSloToolParams, ListSlosTool, ListSlosToolParams};
pub use triggers::{GetTriggerTool, GetTriggerToolParams, ListTriggersTool, ListTriggersToolParams};

use crate::error::ToolResult;
use crate::registry::ToolRegistry;

/// Registers every Honeycomb tool.
///
/// # Errors
///
/// Returns an error if one of the names is already taken in `registry`.
pub fn register_honeycomb_tools(registry: &mut ToolRegistry) -> ToolResult<()> {
    registry
        .register::<ListDatasetsTool>()?
        .register::<GetDatasetTool>()?
        .register::<GetColumnsTool>()?
        .register::<RunQueryTool>()?
        .register::<RunAnalysisQueryTool>()?
        .register::<AnalyzeColumnTool>()?
        .register::<ListSlosTool>()?
        .register::<GetSloTool>()?
        .register::<ListTriggersTool>()?
        .register::<GetTriggerTool>()?;
    Ok(())
}

/// A registry holding exactly the Honeycomb tools.
///
/// # Errors
///
/// Only fails if two Honeycomb tools share a name.
pub fn honeycomb_tool_registry() -> ToolResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_honeycomb_tools(&mut registry)?;
    Ok(registry)
}
