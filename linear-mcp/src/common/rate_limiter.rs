//! Rate limiting for MCP tool calls
//!
//! Every tool call draws from a token bucket keyed by tool name. Tools that
//! fan out into many Linear requests draw from a smaller bucket so that an
//! eager client cannot exhaust the workspace's API quota.

use crate::{LinearMcpError, Result};
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Default requests per window for ordinary tools
pub const DEFAULT_OPERATION_LIMIT: u32 = 60;

/// Default requests per window for expensive tools
pub const DEFAULT_EXPENSIVE_OPERATION_LIMIT: u32 = 5;

/// Tools whose single call can issue hundreds of remote requests
pub const EXPENSIVE_OPERATIONS: &[&str] = &["linear_getStaleProjects"];

/// Configuration for the rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Requests per window for ordinary tools
    pub operation_limit: u32,
    /// Requests per window for tools listed in [`EXPENSIVE_OPERATIONS`]
    pub expensive_operation_limit: u32,
    /// Refill window
    pub window_duration: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            operation_limit: DEFAULT_OPERATION_LIMIT,
            expensive_operation_limit: DEFAULT_EXPENSIVE_OPERATION_LIMIT,
            window_duration: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct TokenBucket {
    capacity: u32,
    tokens: u32,
    last_refill: Instant,
    /// tokens per second
    refill_rate: f64,
}

impl TokenBucket {
    fn new(capacity: u32, window_duration: Duration) -> Self {
        Self {
            capacity,
            tokens: capacity,
            last_refill: Instant::now(),
            refill_rate: capacity as f64 / window_duration.as_secs_f64(),
        }
    }

    fn try_consume(&mut self, tokens: u32) -> bool {
        self.refill();
        if self.tokens >= tokens {
            self.tokens -= tokens;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        let tokens_to_add = (elapsed * self.refill_rate) as u32;
        // partial tokens carry over to the next refill
        if tokens_to_add > 0 {
            self.tokens = (self.tokens.saturating_add(tokens_to_add)).min(self.capacity);
            self.last_refill = now;
        }
    }

    fn time_until_token(&self) -> Duration {
        if self.tokens > 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / self.refill_rate)
        }
    }
}

/// Token-bucket rate limiter keyed by operation name
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a rate limiter with default limits
    pub fn new() -> Self {
        Self::with_config(RateLimiterConfig::default())
    }

    /// Create a rate limiter with custom limits
    pub fn with_config(config: RateLimiterConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Consume `cost` tokens for `operation`, or fail with
    /// [`LinearMcpError::RateLimited`] if the bucket is empty
    pub fn check_rate_limit(&self, operation: &str, cost: u32) -> Result<()> {
        let mut bucket = self
            .buckets
            .entry(operation.to_string())
            .or_insert_with(|| {
                TokenBucket::new(self.operation_limit(operation), self.config.window_duration)
            });

        if bucket.try_consume(cost) {
            Ok(())
        } else {
            Err(LinearMcpError::RateLimited(format!(
                "Rate limit exceeded for '{}'. Retry after {}ms",
                operation,
                bucket.time_until_token().as_millis()
            )))
        }
    }

    /// Limit per window that applies to `operation`
    pub fn operation_limit(&self, operation: &str) -> u32 {
        if EXPENSIVE_OPERATIONS.contains(&operation) {
            self.config.expensive_operation_limit
        } else {
            self.config.operation_limit
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bucket_consume() {
        let mut bucket = TokenBucket::new(5, Duration::from_secs(60));

        assert!(bucket.try_consume(3));
        assert_eq!(bucket.tokens, 2);
        assert!(bucket.try_consume(2));
        assert!(!bucket.try_consume(1));
    }

    #[test]
    fn test_ordinary_operation_limit() {
        let limiter = RateLimiter::with_config(RateLimiterConfig {
            operation_limit: 2,
            expensive_operation_limit: 1,
            window_duration: Duration::from_secs(60),
        });

        assert!(limiter.check_rate_limit("linear_getProjects", 1).is_ok());
        assert!(limiter.check_rate_limit("linear_getProjects", 1).is_ok());
        let err = limiter
            .check_rate_limit("linear_getProjects", 1)
            .unwrap_err();
        assert!(matches!(err, LinearMcpError::RateLimited(_)));
        assert!(err.to_string().contains("linear_getProjects"));
    }

    #[test]
    fn test_expensive_operation_has_its_own_bucket() {
        let limiter = RateLimiter::with_config(RateLimiterConfig {
            operation_limit: 10,
            expensive_operation_limit: 1,
            window_duration: Duration::from_secs(60),
        });

        assert!(limiter.check_rate_limit("linear_getStaleProjects", 1).is_ok());
        assert!(limiter
            .check_rate_limit("linear_getStaleProjects", 1)
            .is_err());
        assert!(limiter.check_rate_limit("linear_getProjects", 1).is_ok());
    }

    #[test]
    fn test_operation_limit_lookup() {
        let limiter = RateLimiter::new();
        assert_eq!(
            limiter.operation_limit("linear_getStaleProjects"),
            DEFAULT_EXPENSIVE_OPERATION_LIMIT
        );
        assert_eq!(
            limiter.operation_limit("anything_else"),
            DEFAULT_OPERATION_LIMIT
        );
    }
}
