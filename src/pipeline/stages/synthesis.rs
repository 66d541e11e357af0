//! Stage 6: narrative synthesis over the accumulated stage outputs
//!
//! The synthesizer receives the verification text plus the stage-3 and
//! stage-5 rows stringified as JSON.

use anyhow::Result;
use async_trait::async_trait;

use crate::agent::types::{DataEnvelope, SynthesisRequest};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::{PipelineStage, DEFAULT_TEMPERATURE};
use crate::util::clean_markdown;

pub struct SynthesisStage;

#[async_trait]
impl PipelineStage for SynthesisStage {
    fn name(&self) -> &'static str {
        "synthesis"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        let request = SynthesisRequest {
            markdown_summary: ctx.proposal.verification_text.clone().unwrap_or_default(),
            assessor_summary: serde_json::to_string(&ctx.map_priorities)?,
            overlap_summary: serde_json::to_string(&ctx.overlaps)?,
            llm_config: ctx.model.model_config(DEFAULT_TEMPERATURE),
        };

        let envelope: DataEnvelope<String> = agent
            .call(AgentEndpoint::Summarizer, serde_json::to_value(&request)?)
            .await
            .and_then(decode_envelope)?;

        ctx.proposal.summary_text = Some(clean_markdown(&envelope.data));
        Ok(())
    }
}
