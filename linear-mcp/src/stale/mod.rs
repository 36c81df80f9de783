//! Stale project detection
//!
//! A project is stale when it has no initiative, its own record has not
//! changed within the staleness window, and none of its issues changed
//! within that window either. Detection runs as a pipeline:
//!
//! 1. [`cutoff`] turns "N months" into an instant
//! 2. [`fetcher`] pages through every project with initiative and team inlined
//! 3. [`classifier`] splits projects and picks the stale candidates
//! 4. [`prober`] asks the issue API about each candidate
//! 5. [`assembler`] builds the report
//!
//! Fast mode (`no_initiative_only`) stops after step 3 and lists every
//! project without an initiative, issuing no issue queries at all.

pub mod assembler;
pub mod classifier;
pub mod cutoff;
pub mod fetcher;
pub mod prober;
pub mod types;

pub use classifier::{classify, Classification};
pub use cutoff::{staleness_cutoff, DEFAULT_STALENESS_MONTHS};
pub use fetcher::{fetch_projects, PROJECT_PAGE_SIZE};
pub use prober::{probe_all, probe_candidate, ProbeOutcome, DEFAULT_PROBE_CONCURRENCY};
pub use types::{
    ActiveProjectResult, FastReport, FastSummary, FullReport, FullSummary,
    ProjectSnapshot, ProjectWithoutInitiative, SkippedProjectResult, StaleProjectResult,
    StaleProjectsOptions, StaleProjectsReport, StaleReason,
};

use crate::linear::LinearApi;
use crate::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Runs stale project detection against a Linear workspace
#[derive(Clone)]
pub struct StaleProjectDetector {
    api: Arc<dyn LinearApi>,
    probe_concurrency: usize,
}

impl std::fmt::Debug for StaleProjectDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaleProjectDetector")
            .field("probe_concurrency", &self.probe_concurrency)
            .finish_non_exhaustive()
    }
}

impl StaleProjectDetector {
    /// Create a detector with the default probe concurrency
    pub fn new(api: Arc<dyn LinearApi>) -> Self {
        Self {
            api,
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
        }
    }

    /// Set how many candidates are probed at once (at least one)
    pub fn with_probe_concurrency(mut self, probe_concurrency: usize) -> Self {
        self.probe_concurrency = probe_concurrency.max(1);
        self
    }

    /// Detect stale projects as of now
    pub async fn detect(&self, options: &StaleProjectsOptions) -> Result<StaleProjectsReport> {
        self.detect_at(options, Utc::now()).await
    }

    /// Detect stale projects as of `now`
    ///
    /// # Errors
    ///
    /// Fails only when a project page cannot be fetched. Issue probe failures
    /// are reported per project in `skippedProjects`.
    pub async fn detect_at(
        &self,
        options: &StaleProjectsOptions,
        now: DateTime<Utc>,
    ) -> Result<StaleProjectsReport> {
        let cutoff = staleness_cutoff(now, options.staleness_months);
        tracing::info!(
            "Detecting stale projects: months={}, cutoff={}, include_archived={}, no_initiative_only={}, limit={:?}",
            options.staleness_months,
            cutoff::cutoff_date_string(cutoff),
            options.include_archived,
            options.no_initiative_only,
            options.limit
        );

        let snapshots = fetch_projects(
            self.api.as_ref(),
            options.include_archived,
            options.limit,
            cutoff,
        )
        .await?;
        let total = snapshots.len();
        let classification = classify(snapshots, options.no_initiative_only);

        if options.no_initiative_only {
            let report = assembler::assemble_fast(total, &classification, options.limit);
            tracing::info!(
                "Analyzed {} projects, {} without initiative",
                total,
                report.summary.projects_without_initiative
            );
            return Ok(StaleProjectsReport::Fast(report));
        }

        tracing::debug!(
            "Probing {} stale candidates with concurrency {}",
            classification.stale_candidates.len(),
            self.probe_concurrency
        );
        let outcomes = probe_all(
            self.api.as_ref(),
            &classification.stale_candidates,
            cutoff,
            self.probe_concurrency,
        )
        .await;

        let report = assembler::assemble_full(total, &classification, outcomes, cutoff, options.limit);
        tracing::info!(
            "Analyzed {} projects: {} stale, {} active, {} skipped",
            total,
            report.summary.stale_count,
            report.summary.active_count,
            report.summary.skipped_count
        );
        Ok(StaleProjectsReport::Full(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::mock::{MockLinearApi, MockProject};
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_detect_full_mode() {
        let api = Arc::new(
            MockLinearApi::new()
                .with_project(MockProject::new("quiet", "Quiet", at(2024, 1, 1)))
                .with_project(MockProject::new("busy", "Busy", at(2024, 1, 1)))
                .with_issue("busy", at(2025, 5, 1)),
        );
        let detector = StaleProjectDetector::new(api.clone()).with_probe_concurrency(2);

        let report = detector
            .detect_at(&StaleProjectsOptions::default(), at(2025, 6, 1))
            .await
            .unwrap();
        let full = report.as_full().unwrap();

        assert_eq!(full.stale_projects[0].id, "quiet");
        assert_eq!(full.stale_projects[0].reason, StaleReason::NoIssues);
        assert_eq!(full.active_projects[0].id, "busy");
        assert_eq!(full.summary.staleness_cutoff_date, "2024-12-01");
        assert_eq!(api.issue_calls(), 3);
    }

    #[tokio::test]
    async fn test_detect_runs_on_spawned_task() {
        let api = Arc::new(
            MockLinearApi::new()
                .with_project(MockProject::new("a", "A", at(2024, 1, 1)))
                .with_project(MockProject::new("b", "B", at(2024, 1, 1)))
                .with_issue("b", at(2025, 5, 1)),
        );
        let detector = StaleProjectDetector::new(api).with_probe_concurrency(4);

        let handle = tokio::spawn(async move {
            detector
                .detect_at(&StaleProjectsOptions::default(), at(2025, 6, 1))
                .await
        });
        let report = handle.await.unwrap().unwrap();

        let full = report.as_full().unwrap();
        assert_eq!(full.summary.stale_count, 1);
        assert_eq!(full.summary.active_count, 1);
    }

    #[tokio::test]
    async fn test_detect_fast_mode() {
        let api = Arc::new(
            MockLinearApi::new()
                .with_project(MockProject::new("a", "A", at(2024, 1, 1)))
                .with_project(MockProject::new("b", "B", at(2024, 1, 1)).with_initiative()),
        );
        let options = StaleProjectsOptions {
            no_initiative_only: true,
            ..Default::default()
        };

        let report = StaleProjectDetector::new(api.clone())
            .detect_at(&options, at(2025, 6, 1))
            .await
            .unwrap();

        let fast = report.as_fast().unwrap();
        assert_eq!(fast.projects_without_initiative.len(), 1);
        assert_eq!(api.issue_calls(), 0);
    }

    #[tokio::test]
    async fn test_detect_propagates_page_failure() {
        let api = Arc::new(MockLinearApi::new().with_page_failure(0, "unauthorized"));
        let err = StaleProjectDetector::new(api)
            .detect(&StaleProjectsOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unauthorized");
    }

    #[test]
    fn test_concurrency_floor() {
        let detector = StaleProjectDetector::new(Arc::new(MockLinearApi::new()))
            .with_probe_concurrency(0);
        assert_eq!(detector.probe_concurrency, 1);
    }
}
