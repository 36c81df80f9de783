//! Model Context Protocol (MCP) server support

pub mod server;
pub mod shared_utils;
pub mod tool_registry;
pub mod tools;

pub use server::LinearMcpServer;
pub use shared_utils::McpErrorHandler;
pub use tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
