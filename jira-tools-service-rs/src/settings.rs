//! Service settings
//!
//! Missing Jira or OpenAI credentials do not stop the service from starting:
//! Jira settings are checked on every fetch, and a missing model key selects
//! the templated analysis.

use tool_sdk::config::{ConfigProvider, ConfigProviderExt};
use tool_sdk::{JiraConfig, OpenAIConfig, Result};

/// Keys are read as `TOOLS_SERVICE_ADDR` and `INTERNAL_API_TOKEN` from the environment
pub const BIND_ADDR_KEY: &str = "tools_service_addr";
pub const INTERNAL_TOKEN_KEY: &str = "internal_api_token";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub bind_addr: String,
    pub jira: JiraConfig,
    pub openai: OpenAIConfig,
    pub internal_api_token: Option<String>,
}

impl ServiceSettings {
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        Ok(Self {
            bind_addr: provider.get_string_or(BIND_ADDR_KEY, DEFAULT_BIND_ADDR),
            jira: JiraConfig::from_provider(provider)?,
            openai: OpenAIConfig::from_provider(provider)?,
            internal_api_token: provider.get_optional(INTERNAL_TOKEN_KEY),
        })
    }
}
