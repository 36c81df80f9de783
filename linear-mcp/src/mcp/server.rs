//! MCP server exposing Linear workspace tools

use crate::common::rate_limiter::RateLimiter;
use crate::config::LinearConfig;
use crate::linear::{LinearApi, LinearClient};
use crate::Result;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

use super::tool_registry::{ToolContext, ToolRegistry};
use super::tools::register_all_tools;

const SERVER_NAME: &str = "linear-mcp";

const INSTRUCTIONS: &str = "Tools for analyzing a Linear workspace. Use linear_getStaleProjects to find projects without an initiative whose issues have had no activity for a number of months.";

/// MCP server for Linear tools
#[derive(Clone)]
pub struct LinearMcpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl LinearMcpServer {
    /// Create a server over an arbitrary [`LinearApi`]
    pub fn new(linear: Arc<dyn LinearApi>, config: LinearConfig) -> Self {
        let mut tool_registry = ToolRegistry::new();
        register_all_tools(&mut tool_registry);
        tracing::debug!("Registered {} MCP tools", tool_registry.len());

        let tool_context = Arc::new(ToolContext::new(
            linear,
            Arc::new(config),
            Arc::new(RateLimiter::new()),
        ));

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context,
        }
    }

    /// Create a server backed by the HTTP client for `config`
    ///
    /// # Errors
    ///
    /// Fails when `config` has no API key or the HTTP client cannot be built.
    pub fn from_config(config: LinearConfig) -> Result<Self> {
        let client = LinearClient::new(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Names of all registered tools
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_registry.list_tool_names()
    }

    /// Run a tool by name
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tool_registry.get_tool(name) {
            Some(tool) => {
                tracing::debug!("Executing tool '{}'", name);
                tool.execute(arguments.unwrap_or_default(), &self.tool_context)
                    .await
            }
            None => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }

    fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            prompts: None,
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: None,
            logging: None,
            completions: None,
            experimental: None,
        }
    }

    fn implementation() -> Implementation {
        Implementation {
            name: SERVER_NAME.into(),
            version: crate::VERSION.into(),
        }
    }
}

impl ServerHandler for LinearMcpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );

        Ok(InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            instructions: Some(INSTRUCTIONS.into()),
            server_info: Self::implementation(),
        })
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.execute_tool(&request.name, request.arguments).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            server_info: Self::implementation(),
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
