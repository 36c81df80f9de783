//! Stale project detection tool for MCP operations

use crate::mcp::shared_utils::McpErrorHandler;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::stale::{StaleProjectDetector, StaleProjectsOptions, DEFAULT_STALENESS_MONTHS};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::{Deserialize, Serialize};

/// Name the tool is registered under
pub const TOOL_NAME: &str = "linear_getStaleProjects";

/// Arguments of `linear_getStaleProjects`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStaleProjectsRequest {
    /// Months without activity before a project is stale
    #[serde(default)]
    pub staleness_months: Option<i32>,
    /// Include archived projects
    #[serde(default)]
    pub include_archived: Option<bool>,
    /// Fast mode
    #[serde(default)]
    pub no_initiative_only: Option<bool>,
    /// Maximum number of projects to analyze
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<GetStaleProjectsRequest> for StaleProjectsOptions {
    fn from(request: GetStaleProjectsRequest) -> Self {
        Self {
            staleness_months: request.staleness_months.unwrap_or(DEFAULT_STALENESS_MONTHS),
            include_archived: request.include_archived.unwrap_or(false),
            no_initiative_only: request.no_initiative_only.unwrap_or(false),
            limit: request.limit,
        }
    }
}

/// Tool that reports projects without an initiative and without recent activity
#[derive(Default)]
pub struct GetStaleProjectsTool;

impl GetStaleProjectsTool {
    /// Creates a new instance of the GetStaleProjectsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetStaleProjectsTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "stalenessMonths": {
                    "type": "integer",
                    "description": "Months without activity before a project counts as stale (default 6)"
                },
                "includeArchived": {
                    "type": "boolean",
                    "description": "Include archived projects (default false)"
                },
                "noInitiativeOnly": {
                    "type": "boolean",
                    "description": "Only list projects without an initiative, skipping issue activity checks (default false)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of projects to analyze"
                }
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetStaleProjectsRequest = BaseToolImpl::parse_arguments(arguments)?;

        context
            .rate_limiter
            .check_rate_limit(TOOL_NAME, 1)
            .map_err(|e| McpErrorHandler::handle_error(e, "get stale projects"))?;

        let options = StaleProjectsOptions::from(request);
        let detector = StaleProjectDetector::new(context.linear.clone())
            .with_probe_concurrency(context.config.probe_concurrency);

        let report = detector
            .detect(&options)
            .await
            .map_err(|e| McpErrorHandler::handle_error(e, "get stale projects"))?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpErrorHandler::handle_error(e.into(), "serialize stale projects"))?;
        Ok(BaseToolImpl::create_success_response(json))
    }
}
