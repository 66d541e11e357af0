//! Configuration loaded from environment variables with defaults
//!
//! # Environment Variables
//!
//! - `PRECLEAR_AGENT_URL`: base URL of the analysis agent - **required** for
//!   the HTTP client (`validate` rejects an empty value)
//! - `PRECLEAR_AGENT_API_KEY`: shared credential sent as `X-API-Key`
//! - `PRECLEAR_AGENT_TIMEOUT`: per-call timeout in seconds - default: "1800"
//! - `PRECLEAR_MODEL_PROVIDER`: model provider name - default: "google"
//! - `PRECLEAR_MODEL_NAME`: model name - default: "gemini-2.0-flash"
//! - `PRECLEAR_POLL_INTERVAL_MS`: status-feed poll interval - default: "1000"

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::agent::types::ModelProfile;

const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_MODEL_PROVIDER: &str = "google";
const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Agent URL not specified. Set PRECLEAR_AGENT_URL")]
    MissingAgentUrl,

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Connection settings for the external analysis agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Base URL, e.g. "http://agent.internal:8000"
    pub base_url: String,

    /// Shared static credential attached to every request
    pub api_key: String,

    /// Per-call timeout. The upstream does heavy document analysis, so the
    /// default is thirty minutes.
    pub timeout: Duration,

    pub model_provider: String,
    pub model_name: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let timeout_secs = env::var("PRECLEAR_AGENT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_AGENT_TIMEOUT_SECS);

        Self {
            base_url: env::var("PRECLEAR_AGENT_URL").unwrap_or_default(),
            api_key: env::var("PRECLEAR_AGENT_API_KEY").unwrap_or_default(),
            timeout: Duration::from_secs(timeout_secs),
            model_provider: env::var("PRECLEAR_MODEL_PROVIDER")
                .unwrap_or_else(|_| DEFAULT_MODEL_PROVIDER.to_string()),
            model_name: env::var("PRECLEAR_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingAgentUrl);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ParseError {
                field: "PRECLEAR_AGENT_TIMEOUT".to_string(),
                error: "timeout must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn model_profile(&self) -> ModelProfile {
        ModelProfile {
            provider: self.model_provider.clone(),
            name: self.model_name.clone(),
        }
    }
}

/// Pipeline-side settings that are not about the agent connection
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Interval between status-feed polls
    pub poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let poll_ms = env::var("PRECLEAR_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Self {
            poll_interval: Duration::from_millis(poll_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        env::remove_var("PRECLEAR_AGENT_URL");
        env::remove_var("PRECLEAR_AGENT_TIMEOUT");
        env::remove_var("PRECLEAR_MODEL_PROVIDER");
        env::remove_var("PRECLEAR_MODEL_NAME");

        let config = AgentConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(1800));
        assert_eq!(config.model_provider, "google");
        assert_eq!(config.model_name, "gemini-2.0-flash");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingAgentUrl)
        ));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("PRECLEAR_AGENT_URL", "http://agent.internal:8000");
        env::set_var("PRECLEAR_AGENT_TIMEOUT", "60");
        env::set_var("PRECLEAR_MODEL_NAME", "gemini-2.5-pro");

        let config = AgentConfig::default();
        assert_eq!(config.base_url, "http://agent.internal:8000");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.model_name, "gemini-2.5-pro");
        assert!(config.validate().is_ok());

        env::remove_var("PRECLEAR_AGENT_URL");
        env::remove_var("PRECLEAR_AGENT_TIMEOUT");
        env::remove_var("PRECLEAR_MODEL_NAME");
    }

    #[test]
    #[serial]
    fn test_poll_interval_default() {
        env::remove_var("PRECLEAR_POLL_INTERVAL_MS");
        let config = PipelineConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
    }
}
