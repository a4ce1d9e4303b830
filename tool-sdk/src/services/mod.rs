//! Service-specific client implementations

pub mod jira;
pub mod openai;
mod common;

pub use common::{HttpTimeouts, UserAgent};
