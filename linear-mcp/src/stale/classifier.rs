//! Partitioning of fetched projects

use super::types::ProjectSnapshot;

/// Output of [`classify`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Projects linked to at least one initiative
    pub with_initiative: Vec<ProjectSnapshot>,
    /// Projects without an initiative
    pub no_initiative: Vec<ProjectSnapshot>,
    /// No-initiative projects that were not recently updated; empty in fast mode
    pub stale_candidates: Vec<ProjectSnapshot>,
    /// Recently updated projects, with or without an initiative
    pub recently_updated_count: usize,
    /// Initiative projects that were not recently updated; zero in fast mode
    pub with_initiative_not_recent_count: usize,
}

/// Split snapshots by initiative membership and, outside fast mode, narrow
/// the no-initiative group down to stale candidates. Input order is kept.
pub fn classify(snapshots: Vec<ProjectSnapshot>, fast_mode: bool) -> Classification {
    let recently_updated_count = snapshots.iter().filter(|s| s.is_recently_updated).count();
    let (with_initiative, no_initiative): (Vec<_>, Vec<_>) =
        snapshots.into_iter().partition(|s| s.has_initiative);

    if fast_mode {
        return Classification {
            with_initiative,
            no_initiative,
            stale_candidates: Vec::new(),
            recently_updated_count,
            with_initiative_not_recent_count: 0,
        };
    }

    let stale_candidates = no_initiative
        .iter()
        .filter(|s| !s.is_recently_updated)
        .cloned()
        .collect();
    let with_initiative_not_recent_count = with_initiative
        .iter()
        .filter(|s| !s.is_recently_updated)
        .count();

    Classification {
        with_initiative,
        no_initiative,
        stale_candidates,
        recently_updated_count,
        with_initiative_not_recent_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(id: &str, has_initiative: bool, is_recently_updated: bool) -> ProjectSnapshot {
        ProjectSnapshot {
            id: id.to_string(),
            name: id.to_uppercase(),
            state: "started".to_string(),
            team_name: "Core".to_string(),
            url: format!("https://linear.app/acme/project/{id}"),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            has_initiative,
            is_recently_updated,
        }
    }

    fn sample() -> Vec<ProjectSnapshot> {
        vec![
            snapshot("a", true, true),
            snapshot("b", true, false),
            snapshot("c", false, true),
            snapshot("d", false, false),
            snapshot("e", false, false),
        ]
    }

    fn ids(snapshots: &[ProjectSnapshot]) -> Vec<&str> {
        snapshots.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_full_mode() {
        let classification = classify(sample(), false);

        assert_eq!(ids(&classification.with_initiative), ["a", "b"]);
        assert_eq!(ids(&classification.no_initiative), ["c", "d", "e"]);
        assert_eq!(ids(&classification.stale_candidates), ["d", "e"]);
        assert_eq!(classification.recently_updated_count, 2);
        assert_eq!(classification.with_initiative_not_recent_count, 1);
    }

    #[test]
    fn test_fast_mode_skips_candidate_narrowing() {
        let classification = classify(sample(), true);

        assert_eq!(classification.with_initiative.len(), 2);
        assert_eq!(classification.no_initiative.len(), 3);
        assert!(classification.stale_candidates.is_empty());
        assert_eq!(classification.recently_updated_count, 2);
        assert_eq!(classification.with_initiative_not_recent_count, 0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(Vec::new(), false), Classification::default());
    }
}
