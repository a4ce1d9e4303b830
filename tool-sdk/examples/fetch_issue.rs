//! Fetch Issue Demo
//!
//! Fetches one Jira issue using the `JIRA_*` environment variables and prints
//! the flattened record as JSON.
//!
//! ```text
//! JIRA_BASE_URL=https://example.atlassian.net JIRA_EMAIL=me@example.com \
//! JIRA_API_TOKEN=... cargo run -p tool-sdk --example fetch_issue -- OPS-42
//! ```

use tool_sdk::config::EnvConfigProvider;
use tool_sdk::jira::JiraClient;
use tool_sdk::{JiraConfig, Result, ServiceError};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let issue_key = std::env::args()
        .nth(1)
        .ok_or_else(|| ServiceError::validation("usage: fetch_issue <ISSUE-KEY>"))?;

    let config = JiraConfig::from_provider(&EnvConfigProvider::new())?;
    let client = JiraClient::new(config)?;

    let issue = client.fetch_issue(&issue_key).await?;
    println!("{}", serde_json::to_string_pretty(&issue)?);

    Ok(())
}
