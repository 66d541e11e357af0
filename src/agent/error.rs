//! Error taxonomy for the analysis-agent client

use thiserror::Error;

/// Errors surfaced by an [`AgentClient`](super::AgentClient) call
///
/// The client performs no retries; the orchestrator converts any of these
/// into a terminal job state for the failing stage.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// Transport failure or timeout: the agent could not be reached or did
    /// not answer within the client's deadline
    #[error("agent unavailable: {message}")]
    Unavailable { message: String },

    /// The agent answered with a non-success HTTP status
    #[error("agent rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The agent answered 200 but the payload did not match the expected
    /// envelope shape
    #[error("malformed agent payload: {message}")]
    MalformedPayload { message: String },
}

impl AgentError {
    pub fn malformed(message: impl Into<String>) -> Self {
        AgentError::MalformedPayload {
            message: message.into(),
        }
    }
}
