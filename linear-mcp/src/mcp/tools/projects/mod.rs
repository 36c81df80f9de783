//! Project tools for MCP operations
//!
//! Each tool lives in its own submodule together with its description.

pub mod stale;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all project-related tools with the registry
pub fn register_project_tools(registry: &mut ToolRegistry) {
    registry.register(stale::GetStaleProjectsTool::new());
}
