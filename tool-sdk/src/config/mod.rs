//! Configuration management for service clients
//!
//! Values are read through a [`ConfigProvider`] (environment variables in
//! production, an in-memory map in tests) and assembled into typed,
//! per-service config structs. Nothing here is global: callers build the
//! config once and hand it to the client constructors.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Value for `key`, treating missing and blank values alike
    fn get_optional(&self, key: &str) -> Option<String> {
        self.get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Unsigned integer with a default for missing values.
    ///
    /// A value that is present but not a number is an error rather than
    /// silently falling back.
    fn get_u64_or(&self, key: &str, default: u64) -> Result<u64> {
        match self.get_optional(key) {
            None => Ok(default),
            Some(value) => value.parse::<u64>().map_err(|e| {
                ServiceError::configuration(format!("Invalid integer for key {}: {}", key, e))
            }),
        }
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub(crate) fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));
        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ServiceError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ServiceError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

/// Connection settings for a Jira Cloud site.
///
/// Credentials may be absent at load time; [`ServiceConfig::validate`] is
/// checked before every fetch so a misconfigured service still starts and
/// reports the problem per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Site root such as `https://example.atlassian.net`, without trailing slash
    pub base_url: String,

    /// Account email used for basic auth
    pub email: String,

    #[serde(skip_serializing)]
    pub api_token: String,

    /// Overall per-request timeout
    pub timeout_seconds: u64,

    pub connect_timeout_seconds: u64,

    /// Page size requested from the comment endpoint
    pub max_comments: u32,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            max_comments: 50,
        }
    }
}

impl JiraConfig {
    pub const BASE_URL_VAR: &'static str = "JIRA_BASE_URL";
    pub const EMAIL_VAR: &'static str = "JIRA_EMAIL";
    pub const API_TOKEN_VAR: &'static str = "JIRA_API_TOKEN";

    /// Load configuration from a config provider. Missing credentials are
    /// left empty; malformed numeric settings are rejected.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: provider.get_string_or("jira_base_url", ""),
            email: provider.get_string_or("jira_email", ""),
            api_token: provider.get_string_or("jira_api_token", ""),
            timeout_seconds: provider.get_u64_or("jira_timeout_seconds", defaults.timeout_seconds)?,
            connect_timeout_seconds: provider
                .get_u64_or("jira_connect_timeout_seconds", defaults.connect_timeout_seconds)?,
            max_comments: u32::try_from(
                provider.get_u64_or("jira_max_comments", u64::from(defaults.max_comments))?,
            )
            .map_err(|_| {
                ServiceError::configuration("Invalid integer for key jira_max_comments: out of range")
            })?,
        }
        .normalized())
    }

    /// Build from explicit values, e.g. for tests or embedding
    pub fn new(base_url: impl Into<String>, email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            api_token: api_token.into(),
            ..Self::default()
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Names of the required variables that are currently unset
    pub fn missing_variables(&self) -> Vec<&'static str> {
        [
            (Self::BASE_URL_VAR, &self.base_url),
            (Self::EMAIL_VAR, &self.email),
            (Self::API_TOKEN_VAR, &self.api_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl ServiceConfig for JiraConfig {
    fn validate(&self) -> Result<()> {
        let missing = self.missing_variables();
        if !missing.is_empty() {
            return Err(ServiceError::configuration(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ServiceError::configuration(format!("Invalid {}: {}", Self::BASE_URL_VAR, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServiceError::configuration(format!(
                "Invalid {}: unsupported scheme {}",
                Self::BASE_URL_VAR,
                url.scheme()
            )));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "jira"
    }
}

/// Base configuration for OpenAI API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key; `None` disables model-backed analysis
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Organization ID (optional)
    pub org_id: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Base URL (can be changed for proxies)
    pub base_url: String,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            org_id: None,
            model: "gpt-4.1-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl OpenAIConfig {
    /// Load configuration from a config provider. A missing API key is not an
    /// error here; see [`OpenAIConfig::has_credentials`].
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            api_key: provider.get_optional("openai_api_key"),
            org_id: provider.get_optional("openai_org_id"),
            model: provider.get_string_or("openai_model", &defaults.model),
            base_url: provider
                .get_string_or("openai_base_url", &defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            timeout_seconds: provider.get_u64_or("openai_timeout_seconds", defaults.timeout_seconds)?,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.trim().is_empty())
    }
}

impl ServiceConfig for OpenAIConfig {
    fn validate(&self) -> Result<()> {
        if !self.has_credentials() {
            return Err(ServiceError::configuration("OpenAI API key is required"));
        }

        if self.base_url.is_empty() {
            return Err(ServiceError::configuration("OpenAI base URL is required"));
        }

        if self.model.is_empty() {
            return Err(ServiceError::configuration("OpenAI model is required"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "openai"
    }
}
