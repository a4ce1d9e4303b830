//! Tool definitions
//!
//! The set of tools is closed: [`ToolName`] names every tool the service can
//! run, and [`catalog`] describes them for discovery.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::validation::ISSUE_KEY_PARAM;

/// Tools the service can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Fetch one issue with its comments
    FetchJira,
    /// Fetch one issue, then analyze it with the language model
    FetchAndSummarize,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::FetchJira, ToolName::FetchAndSummarize];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::FetchJira => "fetch_jira",
            ToolName::FetchAndSummarize => "fetch_and_summarize",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::FetchJira => "Fetches one Jira issue with comments.",
            ToolName::FetchAndSummarize => {
                "Fetches a Jira issue and generates a summary/root cause using an LLM."
            }
        }
    }

    pub fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            parameters: vec![ParameterDefinition {
                name: ISSUE_KEY_PARAM.to_string(),
                description: "Jira issue key or numeric id".to_string(),
                required: true,
                param_type: "string".to_string(),
                example: Some("SYSCROS-156171".to_string()),
            }],
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a requested tool does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Tool parameter definition
#[derive(Debug, Clone, Serialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Parameter type (string, number, boolean, etc.)
    pub param_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Tool metadata structure
#[derive(Debug, Clone, Serialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDefinition>,
}

/// Metadata for every available tool
pub fn catalog() -> Vec<ToolMetadata> {
    ToolName::ALL.iter().map(ToolName::metadata).collect()
}
