//! # linear-mcp
//!
//! Linear workspace analysis exposed as Model Context Protocol tools.
//!
//! ## Features
//!
//! - **Stale project detection**: find projects without an initiative whose
//!   issues have gone quiet, with a fast listing mode that skips issue probes
//! - **Linear client**: a GraphQL client that pages through projects with
//!   initiative and team membership inlined
//! - **MCP Support**: a tool registry and an `rmcp` server handler
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linear_mcp::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let config = LinearConfig::from_env();
//! let client = LinearClient::new(&config)?;
//! let detector = StaleProjectDetector::new(Arc::new(client));
//!
//! let options = StaleProjectsOptions {
//!     staleness_months: 3,
//!     ..Default::default()
//! };
//! let report = detector.detect(&options).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Shared utilities such as rate limiting
pub mod common;

/// Runtime configuration
pub mod config;

/// Error types used throughout the library
pub mod error;

/// Linear API access
pub mod linear;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// Stale project detection
pub mod stale;

pub use config::LinearConfig;
pub use error::{LinearMcpError, Result};
pub use linear::{LinearApi, LinearClient};
pub use mcp::LinearMcpServer;
pub use stale::{
    StaleProjectDetector, StaleProjectsOptions, StaleProjectsReport, StaleReason,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        LinearApi, LinearClient, LinearConfig, LinearMcpError, LinearMcpServer, Result,
        StaleProjectDetector, StaleProjectsOptions, StaleProjectsReport, StaleReason,
    };

    pub use crate::stale::{FastReport, FullReport};
}
