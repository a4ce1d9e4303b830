//! OpenAI API client implementation
//!
//! A typed client for the Responses API. The client itself does not retry;
//! callers wrap it in a [`RetryExecutor`](crate::resilience::RetryExecutor)
//! with whatever policy suits them.

mod models;
pub use models::*;

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{OpenAIConfig, ServiceConfig};
use crate::error::{ErrorContext, Result, ServiceError};
use crate::services::common::{build_http_client, parse_error_response, HttpTimeouts, UserAgent};

/// OpenAI API client
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    http_client: Client,
    config: OpenAIConfig,
}

impl OpenAIClient {
    /// Create a client; fails when the configuration has no API key
    pub fn new_with_config(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("openai-client".to_string()),
                ..UserAgent::default()
            }),
            HttpTimeouts {
                request: Duration::from_secs(config.timeout_seconds),
                connect: None,
            },
        )?;

        Ok(Self { http_client, config })
    }

    pub fn builder() -> OpenAIClientBuilder {
        OpenAIClientBuilder::default()
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Model identifier used by [`OpenAIClient::complete_text`]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a raw Responses API request
    pub async fn create_response(&self, request: &ResponseRequest) -> Result<ResponseObject> {
        self.post("responses", request).await
    }

    /// Single-prompt completion returning the aggregated output text
    pub async fn complete_text(&self, prompt: &str, max_output_tokens: u32) -> Result<String> {
        let request = ResponseRequest {
            model: self.config.model.clone(),
            input: prompt.to_string(),
            max_output_tokens: Some(max_output_tokens),
            ..Default::default()
        };

        let response = self.create_response(&request).await?;
        if response.status.as_deref() == Some("incomplete") {
            log::warn!("OpenAI response {} is incomplete, output may be truncated", response.id);
        }
        Ok(response.output_text())
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!("Sending request to OpenAI: POST {}", url);

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::authentication("No API key set for OpenAI client"))?;

        let mut builder = self.http_client.post(&url).bearer_auth(api_key).json(body);
        if let Some(ref org) = self.config.org_id {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(parse_error_response("openai", response).await);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ServiceError::parsing(format!("Failed to parse response: {}", e))
                .with_context(ErrorContext::for_service("openai").endpoint(endpoint))
        })
    }
}

/// Builder for OpenAI client
#[derive(Debug, Default)]
pub struct OpenAIClientBuilder {
    config: Option<OpenAIConfig>,
    api_key: Option<String>,
    org_id: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl OpenAIClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration; explicit setters still win
    pub fn config(mut self, config: OpenAIConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<OpenAIClient> {
        let mut config = self.config.unwrap_or_default();

        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(org_id) = self.org_id {
            config.org_id = Some(org_id);
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }

        OpenAIClient::new_with_config(config)
    }
}
