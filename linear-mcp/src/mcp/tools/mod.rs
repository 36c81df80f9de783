//! Tool implementations, grouped by the Linear entity they work on

pub mod projects;

use super::tool_registry::ToolRegistry;

/// Register every tool this server exposes
pub fn register_all_tools(registry: &mut ToolRegistry) {
    projects::register_project_tools(registry);
}
