use async_trait::async_trait;
use serde_json::Value;

use super::error::AgentError;

/// The six analysis operations the external agent exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentEndpoint {
    /// Per-document summarization (stage 1)
    ParseSingle,
    /// Document assessment, used for verification (stage 2) and alignment
    /// scoring (stage 3)
    AssessDocuments,
    /// Structured field extraction (stage 4)
    ExtractFields,
    /// Overlap comparison against the activity vector index (stage 5)
    OverlapComparator,
    /// Narrative synthesis (stage 6)
    Summarizer,
    /// Evaluation-letter generation (stage 7)
    RecommendationGenerator,
}

impl AgentEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            AgentEndpoint::ParseSingle => "/api/v1/parse-single-base64",
            AgentEndpoint::AssessDocuments => "/api/v1/assess-documents",
            AgentEndpoint::ExtractFields => "/api/v1/extract-from-base64",
            AgentEndpoint::OverlapComparator => "/api/v1/overlap-comparator-vector",
            AgentEndpoint::Summarizer => "/api/v1/summarizer",
            AgentEndpoint::RecommendationGenerator => "/api/v1/recommendation-generator",
        }
    }
}

/// Typed capability for invoking the external analysis service
///
/// Implementations are stateless and safe to share across concurrent stage
/// executions. Retry policy lives in the orchestrator, not here.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Posts `body` to `endpoint` and returns the decoded JSON envelope.
    async fn call(&self, endpoint: AgentEndpoint, body: Value) -> Result<Value, AgentError>;

    fn name(&self) -> &str;
}
