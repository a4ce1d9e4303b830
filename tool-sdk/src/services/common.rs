//! Common utilities for service clients
//!
//! Shared HTTP plumbing: client construction with a consistent user agent
//! and timeouts, and normalization of error responses.

use std::fmt;
use std::time::Duration;

use reqwest::{header, Client};
use serde::de::{Deserialize, DeserializeOwned};

use crate::error::{mapping, ErrorContext, ServiceError, Result};

/// UserAgent structure for identifying the client to upstream services
#[derive(Debug, Clone)]
pub struct UserAgent {
    pub app_name: String,
    pub version: String,
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "issue-triage-tools".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: Some("tool-sdk".to_string()),
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Timeouts applied to every request made by a client
#[derive(Debug, Clone, Copy)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Option<Duration>,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: None,
        }
    }
}

/// Build a standard HTTP client with default settings
pub fn build_http_client(user_agent: Option<UserAgent>, timeouts: HttpTimeouts) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    let ua = user_agent.unwrap_or_default().to_string();

    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(&ua)
            .map_err(|e| ServiceError::configuration(format!("Invalid user agent: {}", e)))?,
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeouts.request)
        .gzip(true);
    if let Some(connect) = timeouts.connect {
        builder = builder.connect_timeout(connect);
    }

    builder
        .build()
        .map_err(|e| ServiceError::configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Read the body of a response, never failing
pub async fn read_body_lossy(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Failed to read response body: {}", e),
    }
}

/// Parse error response from HTTP response
pub async fn parse_error_response(service_name: &str, response: reqwest::Response) -> ServiceError {
    let status = response.status();
    let mut context = ErrorContext::for_service(service_name)
        .status_code(status.as_u16())
        .endpoint(response.url().path());

    let body = read_body_lossy(response).await;

    mapping::map_http_error(status, &body, &mut context).with_context(context)
}

/// Parse JSON without serde_json's nesting limit.
///
/// Rich-text documents can nest far deeper than the default limit of 128;
/// the stack is grown on demand instead.
pub fn parse_json_unbounded<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}
