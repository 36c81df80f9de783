//! Issue activity probes for stale candidates
//!
//! Each candidate costs at most two single-item issue queries: one restricted
//! to the staleness window and, when that finds nothing, one unrestricted
//! query that tells "never had issues" apart from "issues went quiet".

use super::types::{ProjectSnapshot, StaleReason};
use crate::linear::{IssueFilter, LinearApi};
use crate::Result;
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};

pub use crate::config::DEFAULT_PROBE_CONCURRENCY;

/// What the probes found out about one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// An issue changed at or after the cutoff
    Active {
        /// That issue's `updatedAt`
        last_activity: DateTime<Utc>,
    },
    /// Nothing changed since the cutoff
    Stale {
        /// Why the project is stale
        reason: StaleReason,
        /// The project's own `updatedAt`
        last_activity: DateTime<Utc>,
    },
    /// A probe failed; activity is unknown
    Skipped {
        /// Probe failure message
        error: String,
    },
}

/// Probe one candidate. Failures are captured as [`ProbeOutcome::Skipped`].
pub async fn probe_candidate(
    api: &dyn LinearApi,
    candidate: &ProjectSnapshot,
    cutoff: DateTime<Utc>,
) -> ProbeOutcome {
    match try_probe(api, candidate, cutoff).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(
                "Skipping project '{}' ({}): {}",
                candidate.name,
                candidate.id,
                e
            );
            ProbeOutcome::Skipped {
                error: e.to_string(),
            }
        }
    }
}

async fn try_probe(
    api: &dyn LinearApi,
    candidate: &ProjectSnapshot,
    cutoff: DateTime<Utc>,
) -> Result<ProbeOutcome> {
    let filter = IssueFilter::for_project(&candidate.id);

    let recent = api
        .list_issues(&filter.clone().updated_since(cutoff), 1)
        .await?;
    if let Some(issue) = recent.nodes.into_iter().next() {
        return Ok(ProbeOutcome::Active {
            last_activity: issue.updated_at,
        });
    }

    let any = api.list_issues(&filter, 1).await?;
    let reason = if any.nodes.is_empty() {
        StaleReason::NoIssues
    } else {
        StaleReason::AllIssuesStale
    };

    Ok(ProbeOutcome::Stale {
        reason,
        last_activity: candidate.updated_at,
    })
}

/// Probe every candidate with at most `concurrency` probes in flight.
///
/// Outcomes come back in candidate order.
pub async fn probe_all(
    api: &dyn LinearApi,
    candidates: &[ProjectSnapshot],
    cutoff: DateTime<Utc>,
    concurrency: usize,
) -> Vec<ProbeOutcome> {
    let probes: Vec<BoxFuture<'_, ProbeOutcome>> = candidates
        .iter()
        .map(|candidate| probe_candidate(api, candidate, cutoff).boxed())
        .collect();

    stream::iter(probes)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::mock::{MockLinearApi, MockProject};
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn candidate(id: &str) -> ProjectSnapshot {
        let node = MockProject::new(id, id, at(2023, 3, 1)).into_node();
        ProjectSnapshot::from_node(node, at(2024, 1, 1))
    }

    #[tokio::test]
    async fn test_recent_issue_is_active() {
        let api = MockLinearApi::new()
            .with_issue("p1", at(2023, 1, 1))
            .with_issue("p1", at(2024, 2, 1));

        let outcome = probe_candidate(&api, &candidate("p1"), at(2024, 1, 1)).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Active {
                last_activity: at(2024, 2, 1)
            }
        );
        assert_eq!(api.issue_calls(), 1);
        assert_eq!(api.issue_queries()[0].updated_since, Some(at(2024, 1, 1)));
    }

    #[tokio::test]
    async fn test_issue_at_cutoff_is_active() {
        let api = MockLinearApi::new().with_issue("p1", at(2024, 1, 1));
        let outcome = probe_candidate(&api, &candidate("p1"), at(2024, 1, 1)).await;
        assert!(matches!(outcome, ProbeOutcome::Active { .. }));
    }

    #[tokio::test]
    async fn test_no_issues() {
        let api = MockLinearApi::new();
        let outcome = probe_candidate(&api, &candidate("p1"), at(2024, 1, 1)).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Stale {
                reason: StaleReason::NoIssues,
                last_activity: at(2023, 3, 1)
            }
        );
        assert_eq!(api.issue_calls(), 2);
        assert_eq!(api.issue_queries()[1].updated_since, None);
    }

    #[tokio::test]
    async fn test_all_issues_stale() {
        let api = MockLinearApi::new().with_issue("p1", at(2023, 6, 1));
        let outcome = probe_candidate(&api, &candidate("p1"), at(2024, 1, 1)).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Stale {
                reason: StaleReason::AllIssuesStale,
                last_activity: at(2023, 3, 1)
            }
        );
    }

    #[tokio::test]
    async fn test_failure_is_skipped() {
        let api = MockLinearApi::new().with_issue_failure("p1", "Rate limit exceeded");
        let outcome = probe_candidate(&api, &candidate("p1"), at(2024, 1, 1)).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Skipped {
                error: "Rate limit exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_second_query_failure_is_skipped() {
        let api = MockLinearApi::new()
            .with_issue("p1", at(2023, 6, 1))
            .with_unfiltered_issue_failure("p1", "Connection reset");
        let outcome = probe_candidate(&api, &candidate("p1"), at(2024, 1, 1)).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Skipped {
                error: "Connection reset".to_string()
            }
        );
        assert_eq!(api.issue_calls(), 2);
    }

    #[tokio::test]
    async fn test_probe_all_keeps_order_and_isolates_failures() {
        let api = MockLinearApi::new()
            .with_issue("a", at(2024, 5, 1))
            .with_issue_failure("b", "boom")
            .with_issue("c", at(2022, 1, 1));
        let candidates = vec![candidate("a"), candidate("b"), candidate("c"), candidate("d")];

        for concurrency in [0, 1, 3, 16] {
            let outcomes = probe_all(&api, &candidates, at(2024, 1, 1), concurrency).await;
            assert_eq!(outcomes.len(), 4);
            assert!(matches!(outcomes[0], ProbeOutcome::Active { .. }));
            assert!(matches!(outcomes[1], ProbeOutcome::Skipped { .. }));
            assert!(matches!(
                outcomes[2],
                ProbeOutcome::Stale {
                    reason: StaleReason::AllIssuesStale,
                    ..
                }
            ));
            assert!(matches!(
                outcomes[3],
                ProbeOutcome::Stale {
                    reason: StaleReason::NoIssues,
                    ..
                }
            ));
        }
    }
}
