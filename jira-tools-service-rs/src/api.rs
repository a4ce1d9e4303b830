//! HTTP surface
//!
//! `GET /health`, `GET /v1/tools` and `POST /v1/tools/call`. Tool calls always
//! answer 200; the outcome is carried in the [`ToolCallResponse`] envelope.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::tool_manager::{ToolCallRequest, ToolCallResponse, ToolDispatcher};
use crate::tools::{catalog, ToolMetadata};

/// Header carrying the internal shared secret
pub const INTERNAL_TOKEN_HEADER: &str = "x-internal-token";

/// Largest accepted request body
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub tools: Vec<ToolMetadata>,
}

/// Create the Axum router with all routes and middleware
pub fn create_router(dispatcher: Arc<ToolDispatcher>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/tools", get(list_tools_handler))
        .route("/v1/tools/call", post(call_tool_handler))
        .layer(RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

async fn list_tools_handler() -> impl IntoResponse {
    Json(CatalogResponse {
        success: true,
        tools: catalog(),
    })
}

async fn call_tool_handler(
    State(dispatcher): State<Arc<ToolDispatcher>>,
    headers: HeaderMap,
    Json(request): Json<ToolCallRequest>,
) -> Json<ToolCallResponse> {
    // A header that is not valid UTF-8 cannot match any configured token
    let token = headers
        .get(INTERNAL_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    Json(dispatcher.call(request, token).await)
}
