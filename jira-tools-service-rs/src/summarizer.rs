//! Issue summarizer
//!
//! Turns a [`CanonicalIssue`] into an [`AnalysisResult`]. With a language
//! model configured the issue is sent to the model and its JSON answer is
//! parsed. Without one, a templated low-confidence result is produced.
//!
//! Model output that cannot be parsed never becomes an error; it degrades to
//! a low-confidence result carrying the raw text. Failures to reach the
//! model (after retries) do propagate.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tool_sdk::jira::CanonicalIssue;
use tool_sdk::openai::OpenAIClient;
use tool_sdk::{Result, RetryConfig, RetryExecutor};

/// Output token cap for the analysis call
pub const MAX_OUTPUT_TOKENS: u32 = 700;

const UNCONFIGURED_ROOT_CAUSE: &str = "OpenAI key not configured; LLM analysis unavailable.";
const PARSE_FAILED_SUMMARY: &str = "LLM parse failed.";
const PARSE_FAILED_ROOT_CAUSE: &str = "Unable to parse structured root cause from model output.";

const PROMPT_HEADER: &str = "You are a senior triage engineer.
Analyze this Jira issue and its comments.
Return strict JSON with keys: summary, root_cause, confidence, evidence
Confidence must be one of low, medium, high based on how certain you are about the root cause.
evidence is a short list of concrete clues from the description and comments.
DATA:
";

/// How sure the analysis is about its root cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Read a model-supplied level; anything unrecognized is `Low`
    pub fn from_model_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str).map(|s| s.trim().to_ascii_lowercase()) {
            Some(level) if level == "high" => Confidence::High,
            Some(level) if level == "medium" => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        })
    }
}

/// Structured root-cause analysis of one issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub root_cause: String,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
}

/// A text completion backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str, max_output_tokens: u32) -> Result<String>;
}

#[async_trait]
impl LanguageModel for OpenAIClient {
    async fn complete(&self, prompt: &str, max_output_tokens: u32) -> Result<String> {
        self.complete_text(prompt, max_output_tokens).await
    }
}

/// Produces analyses, with or without a model
#[derive(Clone)]
pub struct Summarizer {
    model: Option<Arc<dyn LanguageModel>>,
    retry: RetryExecutor,
}

impl fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("model_configured", &self.model.is_some())
            .field("retry", self.retry.config())
            .finish()
    }
}

impl Summarizer {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            model,
            retry: RetryExecutor::default(),
        }
    }

    /// Summarizer that only produces templated results
    pub fn unconfigured() -> Self {
        Self::new(None)
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config);
        self
    }

    pub fn is_model_configured(&self) -> bool {
        self.model.is_some()
    }

    pub async fn summarize(&self, issue: &CanonicalIssue) -> Result<AnalysisResult> {
        let model = match &self.model {
            Some(model) => model,
            None => return Ok(unconfigured_analysis(issue)),
        };

        let prompt = build_prompt(issue)?;
        let raw = self
            .retry
            .execute(|| model.complete(&prompt, MAX_OUTPUT_TOKENS))
            .await?;

        Ok(parse_analysis(&raw, &issue.key))
    }
}

/// Deterministic result used when no model is configured
pub fn unconfigured_analysis(issue: &CanonicalIssue) -> AnalysisResult {
    AnalysisResult {
        summary: format!(
            "{} is {} with priority {}.",
            issue.key,
            issue.status.as_deref().unwrap_or("unknown"),
            issue.priority.as_deref().unwrap_or("unknown")
        ),
        root_cause: UNCONFIGURED_ROOT_CAUSE.to_string(),
        confidence: Confidence::Low,
        evidence: vec![issue.key.clone()],
    }
}

/// Prompt with the issue embedded as JSON
pub fn build_prompt(issue: &CanonicalIssue) -> Result<String> {
    let payload = json!({
        "key": issue.key,
        "summary": issue.summary,
        "status": issue.status,
        "priority": issue.priority,
        "description": issue.description,
        "comments": issue.comments,
    });
    Ok(format!("{}{}", PROMPT_HEADER, serde_json::to_string(&payload)?))
}

/// Remove a surrounding Markdown code fence, with or without a language tag
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Interpret raw model output, degrading instead of failing
pub fn parse_analysis(raw: &str, issue_key: &str) -> AnalysisResult {
    let text = raw.trim();

    match serde_json::from_str::<Value>(strip_code_fences(text)) {
        Ok(Value::Object(fields)) => AnalysisResult {
            summary: text_field(&fields, "summary"),
            root_cause: text_field(&fields, "root_cause"),
            confidence: Confidence::from_model_value(fields.get("confidence")),
            evidence: evidence_list(fields.get("evidence")),
        },
        _ => {
            tracing::warn!(issue_key, "model output was not a JSON object, using raw text");
            AnalysisResult {
                summary: if text.is_empty() {
                    PARSE_FAILED_SUMMARY.to_string()
                } else {
                    text.to_string()
                },
                root_cause: PARSE_FAILED_ROOT_CAUSE.to_string(),
                confidence: Confidence::Low,
                evidence: vec![issue_key.to_string()],
            }
        }
    }
}

fn text_field(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value),
    }
}

fn evidence_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
