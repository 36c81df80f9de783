//! Common utilities module
//!
//! Shared helpers used by the MCP layer.

/// Rate limiting utilities for tool calls
pub mod rate_limiter;

pub use rate_limiter::{RateLimiter, RateLimiterConfig};
