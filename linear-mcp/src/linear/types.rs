//! Wire types for the subset of the Linear GraphQL schema this crate reads

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Relay-style page information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows this one
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page
    pub end_cursor: Option<String>,
}

/// A page of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Nodes in remote order
    pub nodes: Vec<T>,
    /// Absent on inlined sub-connections that were not asked for it
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// A single, final page
    pub fn last_page(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            page_info: PageInfo::default(),
        }
    }
}

/// Initiative membership, fetched only as an existence probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRef {
    /// Initiative ID
    pub id: String,
}

/// Team reference, fetched only for its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    /// Team name
    pub name: String,
}

/// A project with its first initiative and first team inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// Workflow state, e.g. "backlog" or "started"
    pub state: String,
    /// Link to the project in the Linear app
    pub url: String,
    /// Last modification of the project record itself
    pub updated_at: DateTime<Utc>,
    /// At most one linked initiative
    pub initiatives: Connection<InitiativeRef>,
    /// At most one associated team
    pub teams: Connection<TeamRef>,
}

/// An issue, reduced to what activity checks need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    /// Issue ID
    pub id: String,
    /// Last modification of the issue
    pub updated_at: DateTime<Utc>,
}

/// Arguments for one page of the projects query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectsPageRequest {
    /// Page size
    pub first: usize,
    /// Cursor from the previous page
    pub after: Option<String>,
    /// Whether archived projects are included
    pub include_archived: bool,
}

/// Issue filter scoped to a single project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFilter {
    /// Project the issues belong to
    pub project_id: String,
    /// Only issues updated at or after this instant
    pub updated_since: Option<DateTime<Utc>>,
}

impl IssueFilter {
    /// All issues of a project
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            updated_since: None,
        }
    }

    /// Restrict to issues updated at or after `since`
    pub fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.updated_since = Some(since);
        self
    }

    /// Render as a Linear `IssueFilter` input object
    pub fn to_graphql(&self) -> serde_json::Value {
        let mut filter = serde_json::json!({
            "project": { "id": { "eq": self.project_id } }
        });
        if let Some(since) = self.updated_since {
            filter["updatedAt"] = serde_json::json!({ "gte": to_iso_string(since) });
        }
        filter
    }
}

/// Format an instant the way Linear and JavaScript do: UTC, milliseconds, `Z`
pub fn to_iso_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
