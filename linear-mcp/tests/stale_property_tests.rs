//! Property tests for the cutoff calculator and the paged fetcher

use chrono::{DateTime, TimeZone, Utc};
use linear_mcp::linear::mock::{MockLinearApi, MockProject};
use linear_mcp::stale::{fetch_projects, staleness_cutoff, PROJECT_PAGE_SIZE};
use proptest::prelude::*;

fn instant(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn cutoff_is_non_increasing_in_months(
        seconds in 0i64..4_102_444_800,
        a in -240i32..240,
        b in -240i32..240,
    ) {
        let now = instant(seconds);
        let (fewer, more) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(staleness_cutoff(now, more) <= staleness_cutoff(now, fewer));
    }

    #[test]
    fn zero_months_is_now(seconds in 0i64..4_102_444_800) {
        let now = instant(seconds);
        prop_assert_eq!(staleness_cutoff(now, 0), now);
    }

    #[test]
    fn positive_months_never_land_after_now(seconds in 0i64..4_102_444_800, months in 1i32..600) {
        let now = instant(seconds);
        prop_assert!(staleness_cutoff(now, months) < now);
    }

    #[test]
    fn limit_returns_exactly_k(total in 0usize..180, k in 0usize..180) {
        let updated_at = instant(1_700_000_000);
        let api = MockLinearApi::new().with_projects(
            (0..total).map(|i| MockProject::new(&format!("p{i}"), "Project", updated_at)),
        );

        let snapshots = block_on(fetch_projects(&api, false, Some(k), updated_at)).unwrap();

        prop_assert_eq!(snapshots.len(), k.min(total));
        for (i, snapshot) in snapshots.iter().enumerate() {
            prop_assert_eq!(&snapshot.id, &format!("p{i}"));
        }

        let pages_for = |items: usize| items.div_ceil(PROJECT_PAGE_SIZE);
        let expected_pages = if k == 0 {
            0
        } else if k <= total {
            pages_for(k)
        } else {
            pages_for(total).max(1)
        };
        prop_assert_eq!(api.project_page_calls(), expected_pages);
    }
}
