//! Wire types for the six agent operations
//!
//! Field names follow the upstream service's contract, which is partly
//! Indonesian (`skor`, `alasan`, `direktorat`, ...); serde renames keep the
//! domain side in English.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AgentError;

/// Fixed model-configuration payload attached to every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_provider: String,
    pub model_name: String,
    pub temperature: f64,
}

/// Provider/model pair the pipeline runs with; stages derive per-call
/// [`ModelConfig`]s from it with their own temperature.
#[derive(Debug, Clone)]
pub struct ModelProfile {
    pub provider: String,
    pub name: String,
}

impl ModelProfile {
    pub fn model_config(&self, temperature: f64) -> ModelConfig {
        ModelConfig {
            model_provider: self.provider.clone(),
            model_name: self.name.clone(),
            temperature,
        }
    }
}

/// Stage 1: per-document summarization request
#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest {
    pub base64_data: String,
    pub filename: String,
    pub raw_input: String,
    pub category: String,
    pub llm_config: ModelConfig,
}

/// Stages 2 and 3: assessment of documents against a reference document
#[derive(Debug, Clone, Serialize)]
pub struct AssessRequest {
    pub reference_document_name: String,
    pub base64_data: Vec<String>,
    pub filenames: Vec<String>,
    pub llm_config: ModelConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
}

/// Stage 4: structured field extraction from the primary document
#[derive(Debug, Clone, Serialize)]
pub struct ExtractRequest {
    pub base64_data: String,
    pub filename: String,
    pub raw_input: String,
    pub llm_config: ModelConfig,
}

/// Stage 5: overlap comparison of the primary document against the vector index
#[derive(Debug, Clone, Serialize)]
pub struct OverlapRequest {
    pub raw_input: String,
    pub base64_data: String,
    pub llm_config: ModelConfig,
}

/// Stage 6: narrative synthesis over the accumulated stage outputs
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub markdown_summary: String,
    pub assessor_summary: String,
    pub overlap_summary: String,
    pub llm_config: ModelConfig,
}

/// Stage 7: evaluation-letter generation
#[derive(Debug, Clone, Serialize)]
pub struct LetterRequest {
    #[serde(rename = "direktorat")]
    pub work_unit: String,
    #[serde(rename = "rincian_output")]
    pub output_label: String,
    #[serde(rename = "total_biaya")]
    pub total_budget: String,
    pub summarizer_text: String,
    pub user_remarks: String,
    pub llm_config: ModelConfig,
}

/// Envelope for operations answering `{"data": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Envelope for operations answering `{"result": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct ResultEnvelope<T> {
    pub result: T,
}

/// Verdict of one alignment-reference assessment (stage 3)
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityVerdict {
    #[serde(rename = "skor")]
    pub score: i64,
    #[serde(rename = "alasan")]
    pub reason: String,
}

/// One key/value pair from the field extractor (stage 4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedField {
    pub key: String,
    pub value: String,
}

/// One competing work unit from the overlap comparator (stage 5)
#[derive(Debug, Clone, Deserialize)]
pub struct OverlapEntry {
    #[serde(rename = "direktorat")]
    pub work_unit: String,
    #[serde(rename = "skor")]
    pub score: i64,
    /// Localized amount text, parsed by the stage executor
    #[serde(rename = "total_biaya")]
    pub total_budget: String,
    #[serde(rename = "alasan")]
    pub reason: String,
    #[serde(rename = "rincian_output")]
    pub output_label: String,
}

/// Decodes an agent envelope, mapping shape mismatches to
/// [`AgentError::MalformedPayload`].
pub fn decode_envelope<T: DeserializeOwned>(value: Value) -> Result<T, AgentError> {
    serde_json::from_value(value).map_err(|e| AgentError::malformed(e.to_string()))
}
