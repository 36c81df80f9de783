//! Records produced by the stale project detector
//!
//! Everything here serializes with camelCase field names; the two report
//! shapes are distinguished only by which fields are present.

use super::cutoff::DEFAULT_STALENESS_MONTHS;
use crate::linear::types::{to_iso_string, ProjectNode};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Team name reported for projects that have no team
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Caller-facing knobs of one detection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleProjectsOptions {
    /// Calendar months without activity before a project is stale
    pub staleness_months: i32,
    /// Include archived projects
    pub include_archived: bool,
    /// Only report projects without an initiative, skipping issue probes
    pub no_initiative_only: bool,
    /// Maximum number of projects to analyze
    pub limit: Option<usize>,
}

impl Default for StaleProjectsOptions {
    fn default() -> Self {
        Self {
            staleness_months: DEFAULT_STALENESS_MONTHS,
            include_archived: false,
            no_initiative_only: false,
            limit: None,
        }
    }
}

/// One project's relevant facts at fetch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// Workflow state
    pub state: String,
    /// First team's name, or [`UNKNOWN_TEAM`]
    pub team_name: String,
    /// Project URL
    pub url: String,
    /// Last modification of the project record
    pub updated_at: DateTime<Utc>,
    /// Whether at least one initiative links to the project
    pub has_initiative: bool,
    /// Whether `updated_at` is at or after the cutoff
    pub is_recently_updated: bool,
}

impl ProjectSnapshot {
    /// Reduce a fetched node to a snapshot, judged against `cutoff`
    pub fn from_node(node: ProjectNode, cutoff: DateTime<Utc>) -> Self {
        let team_name = node
            .teams
            .nodes
            .into_iter()
            .next()
            .map(|team| team.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string());

        Self {
            has_initiative: !node.initiatives.nodes.is_empty(),
            is_recently_updated: node.updated_at >= cutoff,
            id: node.id,
            name: node.name,
            state: node.state,
            team_name,
            url: node.url,
            updated_at: node.updated_at,
        }
    }
}

/// Why a project was judged stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// The project has never had an issue
    NoIssues,
    /// Issues exist but none changed since the cutoff
    AllIssuesStale,
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleReason::NoIssues => write!(f, "no_issues"),
            StaleReason::AllIssuesStale => write!(f, "all_issues_stale"),
        }
    }
}

/// A stale finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleProjectResult {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// Workflow state
    pub state: String,
    /// First team's name
    pub team_name: String,
    /// Project URL
    pub url: String,
    /// Why the project is stale
    pub reason: StaleReason,
    /// The project's own `updatedAt`
    pub last_activity: String,
}

/// A candidate that turned out to have recent issue activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProjectResult {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// Workflow state
    pub state: String,
    /// First team's name
    pub team_name: String,
    /// Project URL
    pub url: String,
    /// `updatedAt` of the qualifying issue
    pub last_activity: String,
}

/// A candidate whose activity could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedProjectResult {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// Probe failure message
    pub error: String,
}

/// Fast-mode listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithoutInitiative {
    /// Project ID
    pub id: String,
    /// Project name
    pub name: String,
    /// Workflow state
    pub state: String,
    /// First team's name
    pub team_name: String,
    /// Project URL
    pub url: String,
    /// Project `updatedAt`
    pub updated_at: String,
}

impl From<&ProjectSnapshot> for ProjectWithoutInitiative {
    fn from(snapshot: &ProjectSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            state: snapshot.state.clone(),
            team_name: snapshot.team_name.clone(),
            url: snapshot.url.clone(),
            updated_at: to_iso_string(snapshot.updated_at),
        }
    }
}

/// Counts reported by fast mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FastSummary {
    /// Projects fetched
    pub total_projects_analyzed: usize,
    /// Every project with an initiative, recent or not
    pub projects_with_initiative: usize,
    /// Projects without an initiative
    pub projects_without_initiative: usize,
    /// Entries in `skippedProjects`
    pub skipped_count: usize,
    /// The caller's limit, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_applied: Option<usize>,
}

/// Counts reported by full mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSummary {
    /// Projects fetched
    pub total_projects_analyzed: usize,
    /// Projects excluded from candidacy by their own recent update
    pub recently_updated_count: usize,
    /// Only projects with an initiative that were NOT recently updated
    pub projects_with_initiative: usize,
    /// Stale candidates only
    pub projects_without_initiative: usize,
    /// Entries in `staleProjects`
    pub stale_count: usize,
    /// Entries in `activeProjects`
    pub active_count: usize,
    /// Entries in `skippedProjects`
    pub skipped_count: usize,
    /// `YYYY-MM-DD`
    pub staleness_cutoff_date: String,
    /// The caller's limit, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_applied: Option<usize>,
}

/// Output of a fast (`noInitiativeOnly`) run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FastReport {
    /// Projects without an initiative
    pub projects_without_initiative: Vec<ProjectWithoutInitiative>,
    /// Always empty; nothing is probed in fast mode
    pub skipped_projects: Vec<SkippedProjectResult>,
    /// Aggregate counts
    pub summary: FastSummary,
}

/// Output of a full staleness analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullReport {
    /// Stale findings in candidate order
    pub stale_projects: Vec<StaleProjectResult>,
    /// Candidates with recent issue activity
    pub active_projects: Vec<ActiveProjectResult>,
    /// Candidates that could not be probed
    pub skipped_projects: Vec<SkippedProjectResult>,
    /// Aggregate counts
    pub summary: FullSummary,
}

/// Either report shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StaleProjectsReport {
    /// `noInitiativeOnly` listing
    Fast(FastReport),
    /// Probed analysis
    Full(FullReport),
}

impl StaleProjectsReport {
    /// The fast-mode report, if this is one
    pub fn as_fast(&self) -> Option<&FastReport> {
        match self {
            StaleProjectsReport::Fast(report) => Some(report),
            StaleProjectsReport::Full(_) => None,
        }
    }

    /// The full-mode report, if this is one
    pub fn as_full(&self) -> Option<&FullReport> {
        match self {
            StaleProjectsReport::Full(report) => Some(report),
            StaleProjectsReport::Fast(_) => None,
        }
    }
}
