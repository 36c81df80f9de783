//! In-memory [`LinearApi`] for tests
//!
//! `MockLinearApi` serves a fixed workspace of projects and issues, pages
//! through projects with numeric cursors, and can be told to fail specific
//! requests. Counters record how many requests of each kind were made.
//!
//! ```ignore
//! use linear_mcp::linear::mock::{MockLinearApi, MockProject};
//!
//! let api = MockLinearApi::new()
//!     .with_project(MockProject::new("p1", "Onboarding", updated_at).with_initiative())
//!     .with_issue("p1", issue_updated_at);
//! ```

use super::types::{
    Connection, InitiativeRef, IssueFilter, IssueNode, PageInfo, ProjectNode,
    ProjectsPageRequest, TeamRef,
};
use super::LinearApi;
use crate::{LinearMcpError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Builder for a project in the mock workspace
#[derive(Debug, Clone)]
pub struct MockProject {
    node: ProjectNode,
}

impl MockProject {
    /// A project with no initiative and no team
    pub fn new(id: &str, name: &str, updated_at: DateTime<Utc>) -> Self {
        Self {
            node: ProjectNode {
                id: id.to_string(),
                name: name.to_string(),
                state: "backlog".to_string(),
                url: format!("https://linear.app/mock/project/{id}"),
                updated_at,
                initiatives: Connection::last_page(Vec::new()),
                teams: Connection::last_page(Vec::new()),
            },
        }
    }

    /// Link the project to an initiative
    pub fn with_initiative(mut self) -> Self {
        self.node.initiatives = Connection::last_page(vec![InitiativeRef {
            id: format!("initiative-{}", self.node.id),
        }]);
        self
    }

    /// Associate the project with a team
    pub fn with_team(mut self, team: &str) -> Self {
        self.node.teams = Connection::last_page(vec![TeamRef {
            name: team.to_string(),
        }]);
        self
    }

    /// Set the workflow state
    pub fn with_state(mut self, state: &str) -> Self {
        self.node.state = state.to_string();
        self
    }

    /// The wire node this builder produces
    pub fn into_node(self) -> ProjectNode {
        self.node
    }
}

/// In-memory Linear workspace
#[derive(Debug, Default)]
pub struct MockLinearApi {
    projects: Vec<ProjectNode>,
    issues: HashMap<String, Vec<IssueNode>>,
    /// project id -> error message for every issue query on that project
    issue_failures: HashMap<String, String>,
    /// project id -> error message for issue queries without an `updatedAt` bound
    unfiltered_issue_failures: HashMap<String, String>,
    /// zero-based page index -> error message
    page_failures: HashMap<usize, String>,
    project_page_calls: AtomicUsize,
    issue_calls: AtomicUsize,
    project_requests: Mutex<Vec<ProjectsPageRequest>>,
    issue_queries: Mutex<Vec<IssueFilter>>,
}

impl MockLinearApi {
    /// An empty workspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project
    pub fn with_project(mut self, project: MockProject) -> Self {
        self.projects.push(project.into_node());
        self
    }

    /// Add several projects
    pub fn with_projects(mut self, projects: impl IntoIterator<Item = MockProject>) -> Self {
        self.projects
            .extend(projects.into_iter().map(MockProject::into_node));
        self
    }

    /// Add an issue to a project
    pub fn with_issue(mut self, project_id: &str, updated_at: DateTime<Utc>) -> Self {
        let issues = self.issues.entry(project_id.to_string()).or_default();
        let id = format!("{project_id}-issue-{}", issues.len() + 1);
        issues.push(IssueNode { id, updated_at });
        self
    }

    /// Make every issue query for `project_id` fail with `message`
    pub fn with_issue_failure(mut self, project_id: &str, message: &str) -> Self {
        self.issue_failures
            .insert(project_id.to_string(), message.to_string());
        self
    }

    /// Make only the unbounded issue query for `project_id` fail with `message`
    pub fn with_unfiltered_issue_failure(mut self, project_id: &str, message: &str) -> Self {
        self.unfiltered_issue_failures
            .insert(project_id.to_string(), message.to_string());
        self
    }

    /// Make the request for the zero-based `page_index` fail with `message`
    pub fn with_page_failure(mut self, page_index: usize, message: &str) -> Self {
        self.page_failures.insert(page_index, message.to_string());
        self
    }

    /// Number of project page requests served so far
    pub fn project_page_calls(&self) -> usize {
        self.project_page_calls.load(Ordering::SeqCst)
    }

    /// Number of issue requests served so far
    pub fn issue_calls(&self) -> usize {
        self.issue_calls.load(Ordering::SeqCst)
    }

    /// Every project page request received, in arrival order
    pub fn project_requests(&self) -> Vec<ProjectsPageRequest> {
        self.project_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Every issue filter received, in arrival order
    pub fn issue_queries(&self) -> Vec<IssueFilter> {
        self.issue_queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinearApi for MockLinearApi {
    async fn list_projects(&self, request: ProjectsPageRequest) -> Result<Connection<ProjectNode>> {
        let page_index = self.project_page_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.project_requests.lock() {
            requests.push(request.clone());
        }
        if let Some(message) = self.page_failures.get(&page_index) {
            return Err(LinearMcpError::Other(message.clone()));
        }

        let start = match request.after {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| LinearMcpError::GraphQl(format!("Invalid cursor: {cursor}")))?,
            None => 0,
        };

        let total = self.projects.len();
        let end = start.saturating_add(request.first).min(total);
        let nodes = self
            .projects
            .get(start..end)
            .map(<[ProjectNode]>::to_vec)
            .unwrap_or_default();
        let has_next_page = end < total;

        Ok(Connection {
            nodes,
            page_info: PageInfo {
                has_next_page,
                end_cursor: has_next_page.then(|| end.to_string()),
            },
        })
    }

    async fn list_issues(&self, filter: &IssueFilter, first: usize) -> Result<Connection<IssueNode>> {
        self.issue_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.issue_queries.lock() {
            queries.push(filter.clone());
        }

        if let Some(message) = self.issue_failures.get(&filter.project_id) {
            return Err(LinearMcpError::Other(message.clone()));
        }
        if filter.updated_since.is_none() {
            if let Some(message) = self.unfiltered_issue_failures.get(&filter.project_id) {
                return Err(LinearMcpError::Other(message.clone()));
            }
        }

        let nodes = self
            .issues
            .get(&filter.project_id)
            .map(|issues| {
                issues
                    .iter()
                    .filter(|issue| {
                        filter
                            .updated_since
                            .map_or(true, |since| issue.updated_at >= since)
                    })
                    .take(first)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Connection::last_page(nodes))
    }
}
