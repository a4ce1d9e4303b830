//! Error mapping for service-specific APIs
//!
//! Converts upstream error responses into the normalized [`ServiceError`].

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};

/// Map an OpenAI API error body to a ServiceError
pub fn map_openai_error(status: StatusCode, json: &Value, context: &mut ErrorContext) -> ServiceError {
    context.service = "openai".to_string();

    let message = match json.get("error") {
        Some(error) => {
            if let Some(error_type) = error.get("type").and_then(|t| t.as_str()) {
                context.add("error_type", error_type);
            }
            if let Some(code) = error.get("code").and_then(|c| c.as_str()) {
                context.error_code = Some(code.to_string());
            }
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown OpenAI error")
        }
        None => json
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown OpenAI error"),
    };

    by_status(status, message)
}

/// Map a Jira failure response to a ServiceError.
///
/// Jira returns `errorMessages` arrays on most failures, but the raw body is
/// kept in the message so callers see exactly what the tracker said.
pub fn map_jira_error(
    status: StatusCode,
    operation: &str,
    body: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.service = "jira".to_string();
    context.status_code = Some(status.as_u16());

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(first) = json
            .get("errorMessages")
            .and_then(|m| m.as_array())
            .and_then(|m| m.first())
            .and_then(|m| m.as_str())
        {
            context.add("jira_message", first);
        }
    }

    ServiceError::external_service(format!(
        "Failed to fetch {} (HTTP {}): {}",
        operation,
        status.as_u16(),
        body
    ))
}

/// Map a generic HTTP error to a ServiceError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> ServiceError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if context.service == "openai" {
            return map_openai_error(status, &json, context);
        }
        let message = json
            .get("message")
            .or_else(|| json.get("error"))
            .and_then(|m| m.as_str())
            .unwrap_or(body);
        return by_status(status, message);
    }

    let message = if body.is_empty() {
        status.to_string()
    } else if body.len() > 100 {
        format!("{}: {:.100}...", status, body)
    } else {
        format!("{}: {}", status, body)
    };
    by_status(status, &message)
}

fn by_status(status: StatusCode, message: &str) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::rate_limit(message),
        StatusCode::BAD_REQUEST => ServiceError::validation(message),
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        _ => ServiceError::service(message),
    }
}
