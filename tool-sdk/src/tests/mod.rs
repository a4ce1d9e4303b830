//! Integration-style tests for the Tool SDK
//!
//! HTTP clients are exercised against wiremock servers; retry timing runs on
//! tokio's paused clock.

pub mod config_tests;
