//! Tool Manager Module
//!
//! Routes tool calls to the issue fetcher and summarizer. Every call ends in
//! a [`ToolCallResponse`]: authorization, validation and downstream failures
//! are reported in the envelope instead of being raised to the transport.
//!
//! Checks run in a fixed order: internal token, then `issue_key`, then the
//! tool name. Nothing downstream is touched until all three pass.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tool_sdk::jira::{CanonicalIssue, JiraClient};
use tool_sdk::ServiceError;

use crate::summarizer::{AnalysisResult, Summarizer};
use crate::tools::{ToolName, UnknownTool};
use crate::validation::{require_issue_key, ToolValidationError};

/// Tool Manager Error types
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Validation(#[from] ToolValidationError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<UnknownTool> for ToolError {
    fn from(err: UnknownTool) -> Self {
        ToolError::UnknownTool(err.0)
    }
}

/// Incoming tool call
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallRequest {
    pub tool_name: String,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    /// Accepted for compatibility with existing callers; unused
    #[serde(default)]
    pub context_config: Option<Value>,
}

/// Uniform result envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallResponse {
    pub success: bool,
    pub tool_name: String,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Result of `fetch_and_summarize`
#[derive(Debug, Clone, Serialize)]
pub struct SummarizedIssue {
    /// When the issue was fetched (RFC 3339, UTC)
    pub fetched_at: String,
    pub issue: CanonicalIssue,
    pub analysis: AnalysisResult,
}

/// Source of canonical issues
#[async_trait]
pub trait IssueSource: Send + Sync {
    async fn fetch_issue(&self, issue_key: &str) -> tool_sdk::Result<CanonicalIssue>;
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch_issue(&self, issue_key: &str) -> tool_sdk::Result<CanonicalIssue> {
        JiraClient::fetch_issue(self, issue_key).await
    }
}

/// Dispatches tool calls
pub struct ToolDispatcher {
    issues: Arc<dyn IssueSource>,
    summarizer: Summarizer,
    internal_token: Option<String>,
}

impl ToolDispatcher {
    /// `internal_token` of `None` disables the token check
    pub fn new(
        issues: Arc<dyn IssueSource>,
        summarizer: Summarizer,
        internal_token: Option<String>,
    ) -> Self {
        Self {
            issues,
            summarizer,
            internal_token: internal_token.filter(|t| !t.is_empty()),
        }
    }

    pub fn requires_token(&self) -> bool {
        self.internal_token.is_some()
    }

    /// Run a tool call. Never fails; errors are encoded in the response.
    pub async fn call(&self, request: ToolCallRequest, presented_token: Option<&str>) -> ToolCallResponse {
        let start = Instant::now();
        let tool_name = request.tool_name.clone();

        let outcome = self.dispatch(request, presented_token).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                tracing::info!(tool = %tool_name, duration_ms, "tool call succeeded");
                ToolCallResponse {
                    success: true,
                    tool_name,
                    result: Some(result),
                    error: None,
                    duration_ms,
                }
            }
            Err(err) => {
                tracing::warn!(tool = %tool_name, duration_ms, error = %err, "tool call failed");
                ToolCallResponse {
                    success: false,
                    tool_name,
                    result: None,
                    error: Some(err.to_string()),
                    duration_ms,
                }
            }
        }
    }

    async fn dispatch(&self, request: ToolCallRequest, presented_token: Option<&str>) -> Result<Value, ToolError> {
        self.authorize(presented_token)?;
        let issue_key = require_issue_key(&request.parameters)?;
        let tool: ToolName = request.tool_name.parse()?;

        match tool {
            ToolName::FetchJira => {
                let issue = self.issues.fetch_issue(&issue_key).await?;
                Ok(serde_json::to_value(issue)?)
            }
            ToolName::FetchAndSummarize => {
                let issue = self.issues.fetch_issue(&issue_key).await?;
                let fetched_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
                let analysis = self.summarizer.summarize(&issue).await?;
                Ok(serde_json::to_value(SummarizedIssue {
                    fetched_at,
                    issue,
                    analysis,
                })?)
            }
        }
    }

    fn authorize(&self, presented_token: Option<&str>) -> Result<(), ToolError> {
        match &self.internal_token {
            None => Ok(()),
            Some(expected) if presented_token == Some(expected.as_str()) => Ok(()),
            Some(_) => Err(ToolError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tool_sdk::jira::CommentRecord;

    use crate::summarizer::{Confidence, LanguageModel};

    /// Issue source returning a fixed issue or error, counting calls
    struct StubIssues {
        fail_with: Option<fn() -> ServiceError>,
        calls: AtomicUsize,
    }

    impl StubIssues {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail_with: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(make: fn() -> ServiceError) -> Arc<Self> {
            Arc::new(Self {
                fail_with: Some(make),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IssueSource for StubIssues {
        async fn fetch_issue(&self, issue_key: &str) -> tool_sdk::Result<CanonicalIssue> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(make) = self.fail_with {
                return Err(make());
            }
            Ok(CanonicalIssue {
                key: issue_key.to_string(),
                summary: Some("Checkout returns 500".to_string()),
                status: Some("Open".to_string()),
                priority: Some("High".to_string()),
                assignee: None,
                reporter: Some("Dana".to_string()),
                created: "2024-05-01T10:00:00.000+0000".to_string(),
                updated: "2024-05-01T10:00:00.000+0000".to_string(),
                labels: vec!["prod".to_string()],
                description: "all carts fail\n".to_string(),
                comments: vec![CommentRecord {
                    author: None,
                    created: "2024-05-01T11:00:00.000+0000".to_string(),
                    body: "seen again".to_string(),
                }],
                url: format!("https://example.atlassian.net/browse/{}", issue_key),
            })
        }
    }

    /// Model that must never be reached
    struct UnreachableModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageModel for UnreachableModel {
        async fn complete(&self, _prompt: &str, _max_output_tokens: u32) -> tool_sdk::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("{}".to_string())
        }
    }

    fn request(tool_name: &str, parameters: Value) -> ToolCallRequest {
        serde_json::from_value(json!({"tool_name": tool_name, "parameters": parameters})).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_jira_returns_issue() {
        let issues = StubIssues::ok();
        let dispatcher = ToolDispatcher::new(issues.clone(), Summarizer::unconfigured(), None);

        let response = dispatcher
            .call(request("fetch_jira", json!({"issue_key": "OPS-42"})), None)
            .await;

        assert!(response.success, "{:?}", response.error);
        assert_eq!(response.tool_name, "fetch_jira");
        assert_eq!(response.error, None);
        let result = response.result.unwrap();
        assert_eq!(result["key"], "OPS-42");
        assert_eq!(result["assignee"], Value::Null);
        assert_eq!(result["comments"][0]["body"], "seen again");
        assert_eq!(issues.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_and_summarize_wraps_issue_and_analysis() {
        let dispatcher = ToolDispatcher::new(StubIssues::ok(), Summarizer::unconfigured(), None);

        let response = dispatcher
            .call(request("fetch_and_summarize", json!({"issue_key": "OPS-42"})), None)
            .await;

        assert!(response.success);
        let result = response.result.unwrap();
        assert_eq!(result["issue"]["key"], "OPS-42");
        assert_eq!(result["analysis"]["confidence"], "low");
        assert_eq!(result["analysis"]["evidence"], json!(["OPS-42"]));
        assert_eq!(result["analysis"]["summary"], "OPS-42 is Open with priority High.");
        let fetched_at = result["fetched_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(fetched_at).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_tool_touches_nothing() {
        let issues = StubIssues::ok();
        let model = Arc::new(UnreachableModel {
            calls: AtomicUsize::new(0),
        });
        let dispatcher = ToolDispatcher::new(issues.clone(), Summarizer::new(Some(model.clone())), None);

        let response = dispatcher
            .call(request("search_web", json!({"issue_key": "OPS-42"})), None)
            .await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Unknown tool: search_web"));
        assert_eq!(response.result, None);
        assert_eq!(issues.calls(), 0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mismatched_token_is_unauthorized() {
        let issues = StubIssues::ok();
        let model = Arc::new(UnreachableModel {
            calls: AtomicUsize::new(0),
        });
        let dispatcher = ToolDispatcher::new(
            issues.clone(),
            Summarizer::new(Some(model.clone())),
            Some("s3cret".to_string()),
        );

        for presented in [None, Some("wrong"), Some("")] {
            let response = dispatcher
                .call(request("fetch_and_summarize", json!({"issue_key": "OPS-42"})), presented)
                .await;
            assert!(!response.success);
            assert_eq!(response.error.as_deref(), Some("Unauthorized"));
        }

        assert_eq!(issues.calls(), 0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_matching_token_is_accepted() {
        let dispatcher = ToolDispatcher::new(
            StubIssues::ok(),
            Summarizer::unconfigured(),
            Some("s3cret".to_string()),
        );

        let response = dispatcher
            .call(request("fetch_jira", json!({"issue_key": "OPS-42"})), Some("s3cret"))
            .await;

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_empty_configured_token_disables_check() {
        let dispatcher = ToolDispatcher::new(StubIssues::ok(), Summarizer::unconfigured(), Some(String::new()));
        assert!(!dispatcher.requires_token());
    }

    #[tokio::test]
    async fn test_missing_issue_key_is_reported_before_tool_lookup() {
        let issues = StubIssues::ok();
        let dispatcher = ToolDispatcher::new(issues.clone(), Summarizer::unconfigured(), None);

        let response = dispatcher.call(request("no_such_tool", json!({})), None).await;

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Missing required parameter: issue_key")
        );
        assert_eq!(issues.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_issue_key_is_rejected() {
        let issues = StubIssues::ok();
        let dispatcher = ToolDispatcher::new(issues.clone(), Summarizer::unconfigured(), None);

        let response = dispatcher
            .call(request("fetch_jira", json!({"issue_key": "../secrets"})), None)
            .await;

        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Invalid parameter issue_key"));
        assert_eq!(issues.calls(), 0);
    }

    #[tokio::test]
    async fn test_downstream_error_message_is_reported() {
        let issues = StubIssues::failing(|| {
            ServiceError::configuration("Missing environment variables: JIRA_BASE_URL")
        });
        let dispatcher = ToolDispatcher::new(issues.clone(), Summarizer::unconfigured(), None);

        let response = dispatcher
            .call(request("fetch_and_summarize", json!({"issue_key": "OPS-42"})), None)
            .await;

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Missing environment variables: JIRA_BASE_URL")
        );
        assert_eq!(issues.calls(), 1);
    }

    #[tokio::test]
    async fn test_context_config_is_accepted_and_ignored() {
        let dispatcher = ToolDispatcher::new(StubIssues::ok(), Summarizer::unconfigured(), None);
        let request: ToolCallRequest = serde_json::from_value(json!({
            "tool_name": "fetch_jira",
            "parameters": {"issue_key": "OPS-42"},
            "context_config": {"verbosity": "high"}
        }))
        .unwrap();

        assert!(dispatcher.call(request, None).await.success);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Confidence::High).unwrap(), json!("high"));
    }
}
