//! Example showing stale project detection and the MCP tool surface
//!
//! Runs against an in-memory workspace so no API key is needed.

use chrono::{Months, Utc};
use linear_mcp::linear::mock::{MockLinearApi, MockProject};
use linear_mcp::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let ago = |months| now.checked_sub_months(Months::new(months)).unwrap_or(now);

    let api = Arc::new(
        MockLinearApi::new()
            .with_project(MockProject::new("p1", "Legacy importer", ago(9)).with_team("Platform"))
            .with_project(MockProject::new("p2", "Docs refresh", ago(8)))
            .with_project(MockProject::new("p3", "Q3 roadmap", ago(10)).with_initiative())
            .with_issue("p2", ago(1)),
    );

    let detector = StaleProjectDetector::new(api.clone());
    let report = detector.detect(&StaleProjectsOptions::default()).await?;

    if let Some(full) = report.as_full() {
        println!("Cutoff: {}", full.summary.staleness_cutoff_date);
        for project in &full.stale_projects {
            println!("  stale  {} ({})", project.name, project.reason);
        }
        for project in &full.active_projects {
            println!("  active {} (last activity {})", project.name, project.last_activity);
        }
    }

    // The same detector behind the MCP tool
    let server = LinearMcpServer::new(api, LinearConfig::default());
    println!("\nMCP tools: {:?}", server.list_tool_names());

    let mut args = serde_json::Map::new();
    args.insert("noInitiativeOnly".to_string(), serde_json::json!(true));
    let result = server
        .execute_tool("linear_getStaleProjects", Some(args))
        .await
        .map_err(|e| e.message.to_string())?;
    println!("Fast listing: {:?}", result.content);

    Ok(())
}
