//! Cursor-paginated project fetching

use super::types::ProjectSnapshot;
use crate::linear::{LinearApi, ProjectsPageRequest};
use crate::Result;
use chrono::{DateTime, Utc};

/// Projects requested per page
pub const PROJECT_PAGE_SIZE: usize = 50;

/// Fetch projects page by page until the remote runs out or `limit` is hit.
///
/// The limit is checked before every page and every item, so the last page
/// may be cut short. Any page failure aborts the whole fetch.
pub async fn fetch_projects(
    api: &dyn LinearApi,
    include_archived: bool,
    limit: Option<usize>,
    cutoff: DateTime<Utc>,
) -> Result<Vec<ProjectSnapshot>> {
    let reached = |count: usize| limit.is_some_and(|max| count >= max);

    let mut snapshots = Vec::new();
    let mut after: Option<String> = None;
    let mut page = 0usize;

    while !reached(snapshots.len()) {
        let connection = api
            .list_projects(ProjectsPageRequest {
                first: PROJECT_PAGE_SIZE,
                after: after.take(),
                include_archived,
            })
            .await?;
        page += 1;
        tracing::debug!(
            "Fetched project page {} with {} nodes (hasNextPage: {})",
            page,
            connection.nodes.len(),
            connection.page_info.has_next_page
        );

        for node in connection.nodes {
            if reached(snapshots.len()) {
                break;
            }
            snapshots.push(ProjectSnapshot::from_node(node, cutoff));
        }

        match connection.page_info {
            page_info if page_info.has_next_page => match page_info.end_cursor {
                Some(cursor) => after = Some(cursor),
                None => {
                    tracing::warn!(
                        "Project page {} reported more pages without a cursor, stopping",
                        page
                    );
                    break;
                }
            },
            _ => break,
        }
    }

    Ok(snapshots)
}
