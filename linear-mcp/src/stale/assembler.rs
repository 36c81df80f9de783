//! Report assembly

use super::classifier::Classification;
use super::cutoff::cutoff_date_string;
use super::prober::ProbeOutcome;
use super::types::{
    ActiveProjectResult, FastReport, FastSummary, FullReport, FullSummary,
    ProjectWithoutInitiative, SkippedProjectResult, StaleProjectResult,
};
use crate::linear::types::to_iso_string;
use chrono::{DateTime, Utc};

/// Build the fast-mode report: every project without an initiative, unprobed
pub fn assemble_fast(
    total_projects_analyzed: usize,
    classification: &Classification,
    limit: Option<usize>,
) -> FastReport {
    FastReport {
        projects_without_initiative: classification
            .no_initiative
            .iter()
            .map(ProjectWithoutInitiative::from)
            .collect(),
        skipped_projects: Vec::new(),
        summary: FastSummary {
            total_projects_analyzed,
            projects_with_initiative: classification.with_initiative.len(),
            projects_without_initiative: classification.no_initiative.len(),
            skipped_count: 0,
            limit_applied: limit,
        },
    }
}

/// Build the full report from candidates paired with their probe outcomes.
///
/// `outcomes` must be in the same order as `classification.stale_candidates`.
pub fn assemble_full(
    total_projects_analyzed: usize,
    classification: &Classification,
    outcomes: Vec<ProbeOutcome>,
    cutoff: DateTime<Utc>,
    limit: Option<usize>,
) -> FullReport {
    let mut stale_projects = Vec::new();
    let mut active_projects = Vec::new();
    let mut skipped_projects = Vec::new();

    for (candidate, outcome) in classification.stale_candidates.iter().zip(outcomes) {
        match outcome {
            ProbeOutcome::Active { last_activity } => active_projects.push(ActiveProjectResult {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                state: candidate.state.clone(),
                team_name: candidate.team_name.clone(),
                url: candidate.url.clone(),
                last_activity: to_iso_string(last_activity),
            }),
            ProbeOutcome::Stale {
                reason,
                last_activity,
            } => stale_projects.push(StaleProjectResult {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                state: candidate.state.clone(),
                team_name: candidate.team_name.clone(),
                url: candidate.url.clone(),
                reason,
                last_activity: to_iso_string(last_activity),
            }),
            ProbeOutcome::Skipped { error } => skipped_projects.push(SkippedProjectResult {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                error,
            }),
        }
    }

    let summary = FullSummary {
        total_projects_analyzed,
        recently_updated_count: classification.recently_updated_count,
        projects_with_initiative: classification.with_initiative_not_recent_count,
        projects_without_initiative: classification.stale_candidates.len(),
        stale_count: stale_projects.len(),
        active_count: active_projects.len(),
        skipped_count: skipped_projects.len(),
        staleness_cutoff_date: cutoff_date_string(cutoff),
        limit_applied: limit,
    };

    FullReport {
        stale_projects,
        active_projects,
        skipped_projects,
        summary,
    }
}
