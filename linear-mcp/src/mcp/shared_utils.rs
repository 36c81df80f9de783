//! Shared utilities for MCP operations

use crate::LinearMcpError;
use rmcp::Error as McpError;

/// Common error handling patterns for MCP operations
pub struct McpErrorHandler;

impl McpErrorHandler {
    /// Convert a [`LinearMcpError`] to an MCP error.
    ///
    /// - Caller mistakes (configuration, rate limits, 4xx responses) -> `invalid_params`
    /// - Everything else -> `internal_error`
    pub fn handle_error(error: LinearMcpError, operation: &str) -> McpError {
        tracing::error!("MCP operation '{}' failed: {}", operation, error);

        match error {
            LinearMcpError::Config(msg) => {
                McpError::invalid_params(format!("Configuration error: {msg}"), None)
            }
            LinearMcpError::RateLimited(msg) => McpError::invalid_params(msg, None),
            LinearMcpError::Api { status, message } if (400..500).contains(&status) => {
                McpError::invalid_params(
                    format!("Linear API rejected {operation} ({status}): {message}"),
                    None,
                )
            }
            LinearMcpError::Api { status, message } => McpError::internal_error(
                format!("Linear API failed during {operation} ({status}): {message}"),
                None,
            ),
            LinearMcpError::Json(err) => {
                McpError::internal_error(format!("Serialization error: {err}"), None)
            }
            other => McpError::internal_error(format!("{operation} failed: {other}"), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_client_errors_map_to_invalid_params() {
        let cases = [
            LinearMcpError::Config("LINEAR_API_KEY is not set".to_string()),
            LinearMcpError::RateLimited("slow down".to_string()),
            LinearMcpError::Api {
                status: 401,
                message: "Authentication required".to_string(),
            },
        ];

        for error in cases {
            let mcp = McpErrorHandler::handle_error(error, "get stale projects");
            assert_eq!(mcp.code, ErrorCode::INVALID_PARAMS);
        }
    }

    #[test]
    fn test_server_errors_map_to_internal_error() {
        let cases = [
            LinearMcpError::Api {
                status: 502,
                message: "Bad gateway".to_string(),
            },
            LinearMcpError::GraphQl("Entity not found".to_string()),
            LinearMcpError::Other("boom".to_string()),
        ];

        for error in cases {
            let mcp = McpErrorHandler::handle_error(error, "get stale projects");
            assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
        }
    }

    #[test]
    fn test_message_keeps_cause() {
        let mcp = McpErrorHandler::handle_error(
            LinearMcpError::Other("connection reset".to_string()),
            "get stale projects",
        );
        assert!(mcp.message.contains("connection reset"));
        assert!(mcp.message.contains("get stale projects"));
    }
}
