//! Tool parameter validation
//!
//! Every tool takes an `issue_key`. It is placed in an upstream URL path, so
//! beyond presence it must look like a Jira key (`PROJ-123`) or a numeric
//! issue id.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Name of the parameter every tool requires
pub const ISSUE_KEY_PARAM: &str = "issue_key";

/// Longest key accepted; real keys are far shorter
pub const MAX_ISSUE_KEY_LENGTH: usize = 255;

static ISSUE_KEY_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9_]*-[0-9]+|[0-9]+)$"));

/// Tools Service validation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl ToolValidationError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Extract and validate `issue_key` from tool parameters.
///
/// JSON numbers are accepted as numeric issue ids. Absent, null and blank
/// values count as missing; other JSON types are invalid. The returned key
/// is trimmed.
pub fn require_issue_key(parameters: &HashMap<String, Value>) -> Result<String, ToolValidationError> {
    let missing = || ToolValidationError::MissingParameter(ISSUE_KEY_PARAM.to_string());

    let key = match parameters.get(ISSUE_KEY_PARAM) {
        None | Some(Value::Null) => return Err(missing()),
        Some(Value::String(raw)) => raw.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => {
            return Err(ToolValidationError::invalid(
                ISSUE_KEY_PARAM,
                "expected a string or a number",
            ))
        }
    };

    if key.is_empty() {
        return Err(missing());
    }

    validate_issue_key(&key)?;
    Ok(key)
}

/// Check that a key is safe to use as a path segment
pub fn validate_issue_key(key: &str) -> Result<(), ToolValidationError> {
    if key.len() > MAX_ISSUE_KEY_LENGTH {
        return Err(ToolValidationError::invalid(
            ISSUE_KEY_PARAM,
            format!("longer than {} characters", MAX_ISSUE_KEY_LENGTH),
        ));
    }

    let pattern = ISSUE_KEY_PATTERN
        .as_ref()
        .map_err(|e| ToolValidationError::invalid(ISSUE_KEY_PARAM, e.to_string()))?;

    if !pattern.is_match(key) {
        return Err(ToolValidationError::invalid(
            ISSUE_KEY_PARAM,
            format!("'{}' is not an issue key like PROJ-123", key),
        ));
    }

    Ok(())
}
