//! Access to the remote Linear workspace
//!
//! The rest of the crate talks to Linear only through [`LinearApi`], so the
//! production [`LinearClient`] and the in-memory [`mock::MockLinearApi`] are
//! interchangeable.

pub mod client;
pub mod mock;
pub mod types;

use crate::Result;
use async_trait::async_trait;

pub use client::LinearClient;
pub use types::{
    Connection, InitiativeRef, IssueFilter, IssueNode, PageInfo, ProjectNode,
    ProjectsPageRequest, TeamRef,
};

/// The two remote queries the stale project detector depends on
#[async_trait]
pub trait LinearApi: Send + Sync {
    /// Fetch one page of projects with initiative and team probes inlined
    async fn list_projects(&self, request: ProjectsPageRequest) -> Result<Connection<ProjectNode>>;

    /// Fetch at most `first` issues matching `filter`
    async fn list_issues(&self, filter: &IssueFilter, first: usize) -> Result<Connection<IssueNode>>;
}
