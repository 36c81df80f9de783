//! Unified error handling for the linear-mcp library
//!
//! Remote API failures, configuration problems, and local serialization
//! failures all funnel into [`LinearMcpError`] so that callers can decide
//! between aborting an operation and recording a per-item failure.

use std::io;
use thiserror::Error;

/// The main error type for the linear-mcp library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinearMcpError {
    /// Transport-level HTTP failure (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status code
    #[error("Linear API returned status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The GraphQL response carried an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The GraphQL response had no `data` member
    #[error("Missing data in response to {0}")]
    MissingData(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A local rate limit rejected the operation
    #[error("{0}")]
    RateLimited(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl LinearMcpError {
    /// Whether the failure was caused by the caller (bad key, bad input,
    /// throttling) rather than by the service or transport.
    pub fn is_client_error(&self) -> bool {
        match self {
            LinearMcpError::Config(_) | LinearMcpError::RateLimited(_) => true,
            LinearMcpError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LinearMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = LinearMcpError::Api {
            status: 401,
            message: "Authentication required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Linear API returned status 401: Authentication required"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(LinearMcpError::Config("missing key".into()).is_client_error());
        assert!(LinearMcpError::RateLimited("slow down".into()).is_client_error());
        assert!(LinearMcpError::Api {
            status: 403,
            message: String::new()
        }
        .is_client_error());
        assert!(!LinearMcpError::Api {
            status: 502,
            message: String::new()
        }
        .is_client_error());
        assert!(!LinearMcpError::GraphQl("boom".into()).is_client_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LinearMcpError = parse_err.into();
        assert!(matches!(err, LinearMcpError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
