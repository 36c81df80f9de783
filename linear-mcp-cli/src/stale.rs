use anyhow::{Context, Result};
use colored::*;
use is_terminal::IsTerminal;
use linear_mcp::stale::{
    FastReport, FullReport, SkippedProjectResult, StaleProjectDetector, StaleProjectsOptions,
    StaleProjectsReport, StaleReason,
};
use linear_mcp::{LinearClient, LinearConfig};
use std::io;
use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Last activity")]
    last_activity: String,
    #[tabled(rename = "URL")]
    url: String,
}

#[derive(Tabled)]
struct SkippedRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// Run the detector once against the configured workspace
pub async fn run_stale_command(
    config: &LinearConfig,
    options: StaleProjectsOptions,
    format: OutputFormat,
) -> Result<i32> {
    let client = LinearClient::new(config).context("Failed to create Linear client")?;
    let detector =
        StaleProjectDetector::new(Arc::new(client)).with_probe_concurrency(config.probe_concurrency);

    let report = detector
        .detect(&options)
        .await
        .context("Stale project detection failed")?;

    let use_color = io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
    println!("{}", render_report(&report, format, use_color)?);

    Ok(exit_code_for(&report))
}

/// Warn when some candidates could not be checked
pub fn exit_code_for(report: &StaleProjectsReport) -> i32 {
    let skipped = match report {
        StaleProjectsReport::Fast(report) => report.skipped_projects.len(),
        StaleProjectsReport::Full(report) => report.skipped_projects.len(),
    };
    if skipped > 0 {
        EXIT_WARNING
    } else {
        EXIT_SUCCESS
    }
}

/// Render a report in the requested format
pub fn render_report(
    report: &StaleProjectsReport,
    format: OutputFormat,
    use_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => Ok(match report {
            StaleProjectsReport::Fast(report) => render_fast(report, use_color),
            StaleProjectsReport::Full(report) => render_full(report, use_color),
        }),
    }
}

fn render_full(report: &FullReport, use_color: bool) -> String {
    let summary = &report.summary;
    let mut sections = vec![format!(
        "Staleness cutoff: {}",
        summary.staleness_cutoff_date
    )];

    for (reason, title) in [
        (StaleReason::NoIssues, "Stale: no issues"),
        (StaleReason::AllIssuesStale, "Stale: all issues stale"),
    ] {
        let rows: Vec<ProjectRow> = report
            .stale_projects
            .iter()
            .filter(|p| p.reason == reason)
            .map(|p| ProjectRow {
                name: p.name.clone(),
                team: p.team_name.clone(),
                state: p.state.clone(),
                last_activity: date_part(&p.last_activity),
                url: p.url.clone(),
            })
            .collect();
        if !rows.is_empty() {
            sections.push(heading(&format!("{title} ({})", rows.len()), use_color));
            sections.push(table(rows, use_color));
        }
    }

    if !report.active_projects.is_empty() {
        let rows: Vec<ProjectRow> = report
            .active_projects
            .iter()
            .map(|p| ProjectRow {
                name: p.name.clone(),
                team: p.team_name.clone(),
                state: p.state.clone(),
                last_activity: date_part(&p.last_activity),
                url: p.url.clone(),
            })
            .collect();
        sections.push(heading(
            &format!("Active despite stale project record ({})", rows.len()),
            use_color,
        ));
        sections.push(table(rows, use_color));
    }

    if !report.skipped_projects.is_empty() {
        sections.push(heading(
            &format!("Could not be checked ({})", report.skipped_projects.len()),
            use_color,
        ));
        sections.push(skipped_table(&report.skipped_projects, use_color));
    }

    if report.stale_projects.is_empty() {
        sections.push("No stale projects found.".to_string());
    }

    let mut footer = format!(
        "Analyzed {} projects: {} recently updated, {} with initiative, {} candidates ({} stale, {} active, {} skipped)",
        summary.total_projects_analyzed,
        summary.recently_updated_count,
        summary.projects_with_initiative,
        summary.projects_without_initiative,
        summary.stale_count,
        summary.active_count,
        summary.skipped_count
    );
    if let Some(limit) = summary.limit_applied {
        footer.push_str(&format!(", limit {limit}"));
    }
    sections.push(footer);

    sections.join("\n\n")
}

fn render_fast(report: &FastReport, use_color: bool) -> String {
    let summary = &report.summary;
    let mut sections = Vec::new();

    if report.projects_without_initiative.is_empty() {
        sections.push("Every project belongs to an initiative.".to_string());
    } else {
        let rows: Vec<ProjectRow> = report
            .projects_without_initiative
            .iter()
            .map(|p| ProjectRow {
                name: p.name.clone(),
                team: p.team_name.clone(),
                state: p.state.clone(),
                last_activity: date_part(&p.updated_at),
                url: p.url.clone(),
            })
            .collect();
        sections.push(heading(
            &format!("Projects without initiative ({})", rows.len()),
            use_color,
        ));
        sections.push(table(rows, use_color));
    }

    let mut footer = format!(
        "Analyzed {} projects: {} with initiative, {} without",
        summary.total_projects_analyzed,
        summary.projects_with_initiative,
        summary.projects_without_initiative
    );
    if let Some(limit) = summary.limit_applied {
        footer.push_str(&format!(", limit {limit}"));
    }
    sections.push(footer);

    sections.join("\n\n")
}

fn table<T: Tabled>(rows: Vec<T>, use_color: bool) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    if use_color {
        table.with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_CYAN));
    }
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    table.to_string()
}

fn skipped_table(skipped: &[SkippedProjectResult], use_color: bool) -> String {
    let rows: Vec<SkippedRow> = skipped
        .iter()
        .map(|p| SkippedRow {
            name: p.name.clone(),
            id: p.id.clone(),
            error: p.error.clone(),
        })
        .collect();
    table(rows, use_color)
}

fn heading(text: &str, use_color: bool) -> String {
    if use_color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// `YYYY-MM-DD` prefix of an ISO instant
fn date_part(iso: &str) -> String {
    iso.get(..10).unwrap_or(iso).to_string()
}
