use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::client::{AgentClient, AgentEndpoint};
use super::error::AgentError;

/// Scripted agent for tests: responses are consumed in FIFO order and every
/// call is recorded for later assertion.
pub struct MockAgentClient {
    responses: Mutex<VecDeque<Result<Value, AgentError>>>,
    calls: Mutex<Vec<(AgentEndpoint, Value)>>,
}

impl MockAgentClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, payload: Value) {
        self.responses.lock().unwrap().push_back(Ok(payload));
    }

    pub fn push_err(&self, error: AgentError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Endpoints and bodies of every call made so far, in order.
    pub fn calls(&self) -> Vec<(AgentEndpoint, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAgentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn call(&self, endpoint: AgentEndpoint, body: Value) -> Result<Value, AgentError> {
        self.calls.lock().unwrap().push((endpoint, body));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AgentError::Unavailable {
                    message: "mock response queue exhausted".to_string(),
                })
            })
    }

    fn name(&self) -> &str {
        "mock-agent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_responses_consumed_in_order() {
        let mock = MockAgentClient::new();
        mock.push_ok(json!({"data": "first"}));
        mock.push_err(AgentError::Rejected {
            status: 500,
            body: "boom".to_string(),
        });

        let first = mock
            .call(AgentEndpoint::ParseSingle, json!({}))
            .await
            .unwrap();
        assert_eq!(first["data"], "first");

        let second = mock.call(AgentEndpoint::ParseSingle, json!({})).await;
        assert!(matches!(second, Err(AgentError::Rejected { status: 500, .. })));
        assert_eq!(mock.remaining_responses(), 0);
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_queue_is_unavailable() {
        let mock = MockAgentClient::new();
        let result = mock.call(AgentEndpoint::Summarizer, json!({})).await;
        assert!(matches!(result, Err(AgentError::Unavailable { .. })));
    }
}
