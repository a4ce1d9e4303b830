//! Data models for the Jira REST API
//!
//! `Raw*` types mirror the subset of the v3 payloads that is read;
//! [`CanonicalIssue`] is what the client hands back to callers.

use serde::{Deserialize, Serialize};

use super::adf::AdfNode;

/// Fields requested from the issue endpoint
pub const ISSUE_FIELDS: &str =
    "summary,status,priority,assignee,reporter,created,updated,labels,description";

/// An issue flattened to plain text, with its comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIssue {
    pub key: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    /// Tracker timestamp, empty when absent
    pub created: String,
    pub updated: String,
    pub labels: Vec<String>,
    pub description: String,
    pub comments: Vec<CommentRecord>,
    /// Browse link for humans
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: Option<String>,
    pub created: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawIssue {
    pub key: Option<String>,
    #[serde(default)]
    pub fields: RawIssueFields,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawIssueFields {
    pub summary: Option<String>,
    pub status: Option<NamedField>,
    pub priority: Option<NamedField>,
    pub assignee: Option<RawUser>,
    pub reporter: Option<RawUser>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub labels: Option<Vec<String>>,
    pub description: Option<AdfNode>,
}

/// Status, priority and similar `{ "name": ... }` objects
#[derive(Debug, Deserialize)]
pub(crate) struct NamedField {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// One page of `/issue/{key}/comment`
#[derive(Debug, Deserialize)]
pub(crate) struct RawCommentPage {
    pub comments: Option<Vec<RawComment>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    pub author: Option<RawUser>,
    pub created: Option<String>,
    pub body: Option<AdfNode>,
}
