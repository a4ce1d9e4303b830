//! Jira tools service
//!
//! Exposes two tools over HTTP: `fetch_jira` returns one issue flattened to
//! plain text, and `fetch_and_summarize` adds a root-cause analysis from a
//! language model. Calls are dispatched by [`tool_manager::ToolDispatcher`]
//! and always answered with a [`tool_manager::ToolCallResponse`] envelope.

pub mod api;
pub mod settings;
pub mod summarizer;
pub mod tool_manager;
pub mod tools;
pub mod validation;

pub use api::create_router;
pub use settings::ServiceSettings;
pub use summarizer::{AnalysisResult, Confidence, LanguageModel, Summarizer};
pub use tool_manager::{IssueSource, ToolCallRequest, ToolCallResponse, ToolDispatcher, ToolError};
pub use tools::ToolName;
