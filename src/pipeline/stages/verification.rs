//! Stage 2: verification of the full document set against the clearance SOP

use anyhow::Result;
use async_trait::async_trait;

use crate::agent::types::{AssessRequest, DataEnvelope, ResultEnvelope};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::{PipelineStage, DEFAULT_TEMPERATURE};
use crate::util::clean_markdown;

const VERIFICATION_REFERENCE: &str = "sop-clearance.md";

pub struct VerificationStage;

#[async_trait]
impl PipelineStage for VerificationStage {
    fn name(&self) -> &'static str {
        "verification"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        let request = AssessRequest {
            reference_document_name: VERIFICATION_REFERENCE.to_string(),
            base64_data: ctx
                .documents
                .iter()
                .map(|d| d.content_base64.clone())
                .collect(),
            filenames: ctx
                .documents
                .iter()
                .map(|d| d.kind.category_code().to_string())
                .collect(),
            llm_config: ctx.model.model_config(DEFAULT_TEMPERATURE),
            free_text: None,
        };

        let envelope: ResultEnvelope<DataEnvelope<String>> = agent
            .call(
                AgentEndpoint::AssessDocuments,
                serde_json::to_value(&request)?,
            )
            .await
            .and_then(decode_envelope)?;

        ctx.proposal.verification_text = Some(clean_markdown(&envelope.result.data));
        Ok(())
    }
}
