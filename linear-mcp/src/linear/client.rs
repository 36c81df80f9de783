//! GraphQL-over-HTTPS client for the Linear API

use super::types::{Connection, IssueFilter, IssueNode, ProjectNode, ProjectsPageRequest};
use super::LinearApi;
use crate::config::LinearConfig;
use crate::{LinearMcpError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Projects with their first initiative and first team inlined, so that
/// initiative membership and team name cost no extra round trip per project.
pub const PROJECTS_WITH_INITIATIVES_QUERY: &str = r#"
query ProjectsWithInitiatives($first: Int!, $after: String, $includeArchived: Boolean) {
  projects(first: $first, after: $after, includeArchived: $includeArchived) {
    nodes {
      id
      name
      state
      url
      updatedAt
      initiatives(first: 1) { nodes { id } }
      teams(first: 1) { nodes { name } }
    }
    pageInfo { hasNextPage endCursor }
  }
}
"#;

/// Issues matching a filter, reduced to their timestamps
pub const ISSUES_QUERY: &str = r#"
query IssueActivity($first: Int!, $filter: IssueFilter) {
  issues(first: $first, filter: $filter) {
    nodes {
      id
      updatedAt
    }
  }
}
"#;

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProjectsData {
    projects: Connection<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct IssuesData {
    issues: Connection<IssueNode>,
}

/// Linear API client backed by a pooled `reqwest::Client`
#[derive(Clone)]
pub struct LinearClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl LinearClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no API key is set, or an HTTP error
    /// if the underlying client cannot be built.
    pub fn new(config: &LinearConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!("linear-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key,
        })
    }

    /// Endpoint this client posts to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Execute a raw GraphQL operation and deserialize its `data` member
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        tracing::debug!("Linear request: {} {}", operation, variables);

        let response = self
            .http
            .post(&self.api_url)
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_graphql_response(operation, status, &body)
    }
}

#[async_trait]
impl LinearApi for LinearClient {
    async fn list_projects(&self, request: ProjectsPageRequest) -> Result<Connection<ProjectNode>> {
        let data: ProjectsData = self
            .execute(
                "ProjectsWithInitiatives",
                PROJECTS_WITH_INITIATIVES_QUERY,
                json!({
                    "first": request.first,
                    "after": request.after,
                    "includeArchived": request.include_archived,
                }),
            )
            .await?;
        Ok(data.projects)
    }

    async fn list_issues(&self, filter: &IssueFilter, first: usize) -> Result<Connection<IssueNode>> {
        let data: IssuesData = self
            .execute(
                "IssueActivity",
                ISSUES_QUERY,
                json!({ "first": first, "filter": filter.to_graphql() }),
            )
            .await?;
        Ok(data.issues)
    }
}

/// Turn a raw HTTP status and body into typed `data` or a classified error
pub fn parse_graphql_response<T: DeserializeOwned>(
    operation: &str,
    status: u16,
    body: &str,
) -> Result<T> {
    if !(200..300).contains(&status) {
        // Linear reports validation and auth failures as GraphQL errors on a 4xx
        let message = serde_json::from_str::<GraphQlResponse<Value>>(body)
            .ok()
            .filter(|parsed| !parsed.errors.is_empty())
            .map(|parsed| join_messages(&parsed.errors))
            .unwrap_or_else(|| truncate(body.trim(), MAX_ERROR_BODY_CHARS));
        return Err(LinearMcpError::Api { status, message });
    }

    let parsed: GraphQlResponse<T> = serde_json::from_str(body)?;
    if !parsed.errors.is_empty() {
        return Err(LinearMcpError::GraphQl(join_messages(&parsed.errors)));
    }

    parsed
        .data
        .ok_or_else(|| LinearMcpError::MissingData(operation.to_string()))
}

fn join_messages(errors: &[GraphQlErrorMessage]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let err = LinearClient::new(&LinearConfig::default()).err().unwrap();
        assert!(matches!(err, LinearMcpError::Config(_)));
    }

    #[test]
    fn test_new_with_api_key() {
        let config = LinearConfig::default()
            .with_api_key("lin_api_test")
            .with_api_url("http://127.0.0.1:9/graphql");
        let client = LinearClient::new(&config).unwrap();
        assert_eq!(client.api_url(), "http://127.0.0.1:9/graphql");
    }

    #[test]
    fn test_parse_projects_page() {
        let body = r#"{
            "data": {
                "projects": {
                    "nodes": [{
                        "id": "p1",
                        "name": "Onboarding",
                        "state": "backlog",
                        "url": "https://linear.app/acme/project/onboarding",
                        "updatedAt": "2024-01-10T12:00:00.000Z",
                        "initiatives": { "nodes": [] },
                        "teams": { "nodes": [{ "name": "Growth" }] }
                    }],
                    "pageInfo": { "hasNextPage": true, "endCursor": "abc" }
                }
            }
        }"#;

        let data: ProjectsData = parse_graphql_response("ProjectsWithInitiatives", 200, body).unwrap();
        assert_eq!(data.projects.nodes.len(), 1);
        assert!(data.projects.page_info.has_next_page);
        assert_eq!(data.projects.page_info.end_cursor.as_deref(), Some("abc"));
        assert!(data.projects.nodes[0].initiatives.nodes.is_empty());
    }

    #[test]
    fn test_parse_issues_page() {
        let body = r#"{"data":{"issues":{"nodes":[{"id":"i1","updatedAt":"2024-06-01T00:00:00.000Z"}]}}}"#;
        let data: IssuesData = parse_graphql_response("IssueActivity", 200, body).unwrap();
        assert_eq!(data.issues.nodes[0].id, "i1");
    }

    #[test]
    fn test_graphql_errors_on_success_status() {
        let body = r#"{"data":null,"errors":[{"message":"Entity not found"},{"message":"Second"}]}"#;
        let err = parse_graphql_response::<IssuesData>("IssueActivity", 200, body).unwrap_err();
        match err {
            LinearMcpError::GraphQl(message) => assert_eq!(message, "Entity not found; Second"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_data() {
        let err = parse_graphql_response::<IssuesData>("IssueActivity", 200, "{}").unwrap_err();
        assert!(matches!(err, LinearMcpError::MissingData(op) if op == "IssueActivity"));
    }

    #[test]
    fn test_http_error_with_graphql_body() {
        let body = r#"{"errors":[{"message":"Authentication required, not authenticated"}]}"#;
        let err = parse_graphql_response::<IssuesData>("IssueActivity", 400, body).unwrap_err();
        match err {
            LinearMcpError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Authentication required, not authenticated");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_error_with_plain_body() {
        let err = parse_graphql_response::<IssuesData>("IssueActivity", 503, " Service Unavailable ")
            .unwrap_err();
        assert!(matches!(
            err,
            LinearMcpError::Api { status: 503, ref message } if message == "Service Unavailable"
        ));
    }

    #[test]
    fn test_malformed_body_is_json_error() {
        let err = parse_graphql_response::<IssuesData>("IssueActivity", 200, "<html>").unwrap_err();
        assert!(matches!(err, LinearMcpError::Json(_)));
    }

    #[test]
    fn test_truncate_long_body() {
        let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        let truncated = truncate(&long, MAX_ERROR_BODY_CHARS);
        assert_eq!(truncated.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_projects_query_inlines_probes() {
        assert!(PROJECTS_WITH_INITIATIVES_QUERY.contains("initiatives(first: 1)"));
        assert!(PROJECTS_WITH_INITIATIVES_QUERY.contains("teams(first: 1)"));
        assert!(PROJECTS_WITH_INITIATIVES_QUERY.contains("pageInfo { hasNextPage endCursor }"));
    }
}
