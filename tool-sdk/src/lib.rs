//! # Tool SDK
//!
//! Typed clients for the external services used by the issue triage tools.
//!
//! This crate provides:
//!
//! - A Jira Cloud client that returns issues as plain-text records
//! - An OpenAI Responses API client
//! - A single error type, [`ServiceError`], for every integration
//! - Bounded retry with exponential backoff
//! - Configuration providers and typed per-service configs
//!
//! ## Architecture
//!
//! - `services::jira`: issue + comment fetch, ADF flattening
//! - `services::openai`: model calls
//! - `resilience`: `RetryExecutor`, applied per outbound call
//! - `config`: `ConfigProvider` sources and `ServiceConfig` structs
//! - `error`: `ServiceError`, `ErrorContext` and upstream error mapping

pub mod services;
pub use services::{jira, openai};

pub mod error;
pub use error::{ErrorContext, Result, ServiceError};

pub mod resilience;
pub use resilience::{RetryConfig, RetryExecutor, RetryOn};

pub mod config;
pub use config::{ConfigProvider, JiraConfig, OpenAIConfig, ServiceConfig};

mod util;

#[cfg(test)]
mod tests;
