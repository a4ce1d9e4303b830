//! Jira Cloud client
//!
//! Fetches a single issue and its first page of comments from the REST v3
//! API and returns them as a [`CanonicalIssue`] with every rich-text field
//! flattened to plain text.
//!
//! Each HTTP call is wrapped in its own retry executor. Only failures to get
//! a response are retried; a response with any status ends the call, and a
//! non-200 status then fails the whole fetch.

pub mod adf;
mod models;

pub use adf::{flatten, flatten_opt, AdfNode};
pub use models::{CanonicalIssue, CommentRecord, ISSUE_FIELDS};

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{JiraConfig, ServiceConfig};
use crate::error::{mapping, ErrorContext, Result, ServiceError};
use crate::resilience::{RetryConfig, RetryExecutor};
use crate::services::common::{build_http_client, parse_json_unbounded, read_body_lossy, HttpTimeouts};
use crate::util::truncate_string;

use models::{RawCommentPage, RawIssue};

/// Client for the Jira Cloud REST API
#[derive(Debug, Clone)]
pub struct JiraClient {
    http_client: Client,
    config: JiraConfig,
    retry: RetryExecutor,
}

impl JiraClient {
    /// Create a client. Credentials are not checked until the first fetch.
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http_client = build_http_client(
            None,
            HttpTimeouts {
                request: Duration::from_secs(config.timeout_seconds),
                connect: Some(Duration::from_secs(config.connect_timeout_seconds)),
            },
        )?;

        Ok(Self {
            http_client,
            config,
            retry: RetryExecutor::default(),
        })
    }

    /// Replace the retry policy used for each request
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        log::debug!("Jira retry policy: {}", config);
        self.retry = RetryExecutor::new(config);
        self
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    /// Human-facing link to an issue
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{}", self.config.base_url, issue_key)
    }

    /// Fetch an issue with its comments.
    ///
    /// Configuration is checked before any network activity. No partial
    /// record is ever returned: a failure on either request fails the fetch.
    pub async fn fetch_issue(&self, issue_key: &str) -> Result<CanonicalIssue> {
        self.config.validate()?;

        let issue_path = format!("/rest/api/3/issue/{}", issue_key);
        let comments_path = format!("{}/comment", issue_path);
        let max_results = self.config.max_comments.to_string();
        let issue_query = [("fields", ISSUE_FIELDS)];
        let comments_query = [("maxResults", max_results.as_str())];

        log::debug!("Fetching Jira issue {}", issue_key);
        let issue_response = self
            .retry
            .execute(|| self.get(&issue_path, &issue_query))
            .await?;
        let comments_response = self
            .retry
            .execute(|| self.get(&comments_path, &comments_query))
            .await?;

        let issue: RawIssue = Self::read_json(issue_response, "issue", &issue_path).await?;
        let page: RawCommentPage =
            Self::read_json(comments_response, "comments", &comments_path).await?;

        Ok(self.to_canonical(issue_key, issue, page))
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .query(query)
            .send()
            .await?;
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
        path: &str,
    ) -> Result<T> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = read_body_lossy(response).await;
            log::warn!(
                "Jira {} request failed with HTTP {}: {}",
                what,
                status.as_u16(),
                truncate_string(&body, 200)
            );
            let mut context = ErrorContext::for_service("jira").endpoint(path);
            let err = mapping::map_jira_error(status, what, &body, &mut context);
            return Err(err.with_context(context));
        }

        let body = response.text().await?;
        parse_json_unbounded(&body).map_err(|e| {
            ServiceError::parsing(format!("Invalid Jira {} response: {}", what, e))
                .with_context(ErrorContext::for_service("jira").endpoint(path))
        })
    }

    fn to_canonical(&self, issue_key: &str, issue: RawIssue, page: RawCommentPage) -> CanonicalIssue {
        let fields = issue.fields;

        let comments = page
            .comments
            .unwrap_or_default()
            .into_iter()
            .map(|comment| CommentRecord {
                author: comment.author.and_then(|a| a.display_name),
                created: comment.created.unwrap_or_default(),
                body: flatten_opt(comment.body.as_ref()),
            })
            .collect();

        CanonicalIssue {
            key: issue.key.unwrap_or_else(|| issue_key.to_string()),
            summary: fields.summary,
            status: fields.status.and_then(|s| s.name),
            priority: fields.priority.and_then(|p| p.name),
            assignee: fields.assignee.and_then(|a| a.display_name),
            reporter: fields.reporter.and_then(|r| r.display_name),
            created: fields.created.unwrap_or_default(),
            updated: fields.updated.unwrap_or_default(),
            labels: fields.labels.unwrap_or_default(),
            description: flatten_opt(fields.description.as_ref()),
            comments,
            url: self.browse_url(issue_key),
        }
    }
}
