//! Tests for configuration management functionality

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;

    use crate::config::{
        ConfigProvider, ConfigProviderExt, EnvConfigProvider, JiraConfig, MemoryConfigProvider,
        OpenAIConfig, ServiceConfig,
    };
    use crate::error::ServiceError;

    fn jira_values() -> MemoryConfigProvider {
        let mut provider = MemoryConfigProvider::new();
        provider.set("jira_base_url", "https://example.atlassian.net/");
        provider.set("jira_email", "triage@example.com");
        provider.set("jira_api_token", "secret");
        provider
    }

    #[test]
    fn test_memory_provider_helpers() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("timeout", "30");
        provider.set("blank", "   ");
        provider.set("not_a_number", "abc");

        assert_eq!(provider.get_u64_or("timeout", 5).unwrap(), 30);
        assert_eq!(provider.get_u64_or("missing", 5).unwrap(), 5);
        assert!(provider.get_u64_or("not_a_number", 5).is_err());
        assert_eq!(provider.get_optional("blank"), None);
        assert_eq!(provider.get_string_or("blank", "fallback"), "fallback");
        assert!(provider.get_string("missing").is_err());
    }

    #[test]
    fn test_env_provider_reads_prefixed_variables() {
        env::set_var("TOOLSDK_CFG_TEST_API_KEY", "env_test_key");

        let provider = EnvConfigProvider::new().with_prefix("TOOLSDK_CFG_TEST");
        assert_eq!(provider.format_key("api-key"), "TOOLSDK_CFG_TEST_API_KEY");
        assert_eq!(provider.get_string("api_key").unwrap(), "env_test_key");
        assert!(provider.get_string("never_set_anywhere").is_err());

        env::remove_var("TOOLSDK_CFG_TEST_API_KEY");
    }

    #[test]
    fn test_jira_config_trims_trailing_slash_and_applies_defaults() {
        let config = JiraConfig::from_provider(&jira_values()).unwrap();

        assert_eq!(config.base_url, "https://example.atlassian.net");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 5);
        assert_eq!(config.max_comments, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jira_config_lists_every_missing_variable() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("jira_email", "triage@example.com");

        let config = JiraConfig::from_provider(&provider).unwrap();
        let err = config.validate().unwrap_err();

        assert!(matches!(err, ServiceError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "Missing environment variables: JIRA_BASE_URL, JIRA_API_TOKEN"
        );
    }

    #[test]
    fn test_jira_config_rejects_relative_base_url() {
        let config = JiraConfig::new("example.atlassian.net", "a@b.c", "token");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jira_config_rejects_bad_timeout() {
        let mut provider = jira_values();
        provider.set("jira_timeout_seconds", "ten");
        assert!(JiraConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_jira_config_rejects_oversized_comment_limit() {
        let mut provider = jira_values();
        provider.set("jira_max_comments", u64::from(u32::MAX) + 1);

        let err = JiraConfig::from_provider(&provider).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
        assert!(err.to_string().contains("jira_max_comments"));

        provider.set("jira_max_comments", u32::MAX);
        assert_eq!(JiraConfig::from_provider(&provider).unwrap().max_comments, u32::MAX);
    }

    #[test]
    fn test_openai_config_without_key_loads_but_has_no_credentials() {
        let config = OpenAIConfig::from_provider(&MemoryConfigProvider::new()).unwrap();

        assert!(!config.has_credentials());
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_openai_config_overrides() {
        let provider = MemoryConfigProvider::with_values(HashMap::from([
            ("openai_api_key".to_string(), "sk-test".to_string()),
            ("openai_model".to_string(), "gpt-4o".to_string()),
            ("openai_base_url".to_string(), "http://localhost:9999/v1/".to_string()),
        ]));

        let config = OpenAIConfig::from_provider(&provider).unwrap();
        assert!(config.has_credentials());
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let config = JiraConfig::new("https://example.atlassian.net", "a@b.c", "token");
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("api_token").is_none());
    }
}
