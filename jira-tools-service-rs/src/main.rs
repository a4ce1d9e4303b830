// jira-tools-service-rs/src/main.rs
// Main entry point: loads settings, wires the Jira and OpenAI clients into
// the dispatcher and serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use tool_sdk::config::EnvConfigProvider;
use tool_sdk::jira::JiraClient;
use tool_sdk::openai::OpenAIClient;
use tracing_subscriber::EnvFilter;

use jira_tools_service::{create_router, LanguageModel, ServiceSettings, Summarizer, ToolDispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = ServiceSettings::from_provider(&EnvConfigProvider::new())?;

    let missing = settings.jira.missing_variables();
    if !missing.is_empty() {
        tracing::warn!(
            missing = %missing.join(", "),
            "Jira is not fully configured; tool calls will fail until it is"
        );
    }
    let jira = JiraClient::new(settings.jira.clone())?;

    let model: Option<Arc<dyn LanguageModel>> = if settings.openai.has_credentials() {
        Some(Arc::new(OpenAIClient::new_with_config(settings.openai.clone())?))
    } else {
        None
    };
    let summarizer = Summarizer::new(model);
    if summarizer.is_model_configured() {
        tracing::info!(model = %settings.openai.model, "Model-backed analysis enabled");
    } else {
        tracing::warn!("OPENAI_API_KEY not set; summaries will use the templated analysis");
    }

    if settings.internal_api_token.is_none() {
        tracing::warn!("INTERNAL_API_TOKEN not set; /v1/tools/call accepts unauthenticated calls");
    }

    let dispatcher = Arc::new(ToolDispatcher::new(
        Arc::new(jira),
        summarizer,
        settings.internal_api_token.clone(),
    ));

    let app = create_router(dispatcher);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "Jira tools service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Jira tools service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
