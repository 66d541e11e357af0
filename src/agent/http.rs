//! HTTP client for the external analysis agent
//!
//! Every request carries the shared `X-API-Key` credential header and a fixed
//! long timeout: the upstream does heavy document analysis and a single call
//! can legitimately run for many minutes. The client is stateless, pools
//! connections, and can be shared across concurrent stage executions with
//! `Arc`.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::AgentConfig;

use super::client::{AgentClient, AgentEndpoint};
use super::error::AgentError;

const API_KEY_HEADER: &str = "X-API-Key";

pub struct HttpAgentClient {
    base_url: String,
    api_key: String,
    http_client: Client,
    timeout: Duration,
}

impl HttpAgentClient {
    pub fn new(config: &AgentConfig) -> Self {
        Self::with_timeout(
            config.base_url.clone(),
            config.api_key.clone(),
            config.timeout,
        )
    }

    pub fn with_timeout(base_url: String, api_key: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
            timeout,
        }
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn call(&self, endpoint: AgentEndpoint, body: Value) -> Result<Value, AgentError> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        debug!(%url, "Sending agent request");
        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(%url, "Agent request timed out after {:?}", self.timeout);
                    AgentError::Unavailable {
                        message: format!("timed out after {}s", self.timeout.as_secs()),
                    }
                } else if e.is_connect() {
                    error!("Cannot connect to agent at {}", self.base_url);
                    AgentError::Unavailable {
                        message: format!("connection failed: {}", e),
                    }
                } else {
                    error!(%url, "Agent request error: {}", e);
                    AgentError::Unavailable {
                        message: format!("request failed: {}", e),
                    }
                }
            })?;

        let elapsed = start.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%url, %status, "Agent returned error status: {}", body);
            return Err(AgentError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await.map_err(|e| {
            error!(%url, "Failed to decode agent response: {}", e);
            AgentError::malformed(format!("JSON decode error: {}", e))
        })?;

        info!(
            endpoint = endpoint.path(),
            "Agent call completed in {:.2}s",
            elapsed.as_secs_f64()
        );

        Ok(payload)
    }

    fn name(&self) -> &str {
        "http-agent"
    }
}

impl fmt::Debug for HttpAgentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAgentClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = HttpAgentClient::with_timeout(
            "http://localhost:9000/".to_string(),
            "secret".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(client.base_url, "http://localhost:9000");
        assert_eq!(client.name(), "http-agent");
    }

    #[test]
    fn test_debug_omits_api_key() {
        let client = HttpAgentClient::with_timeout(
            "http://localhost:9000".to_string(),
            "secret".to_string(),
            Duration::from_secs(5),
        );
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("localhost:9000"));
        assert!(!debug_str.contains("secret"));
    }
}
