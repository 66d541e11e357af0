//! Stage 7: evaluation-letter generation

use anyhow::Result;
use async_trait::async_trait;

use crate::agent::types::{DataEnvelope, LetterRequest};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::{PipelineStage, DEFAULT_TEMPERATURE};
use crate::util::clean_markdown;

pub struct LetterStage;

#[async_trait]
impl PipelineStage for LetterStage {
    fn name(&self) -> &'static str {
        "evaluation-letter"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        let request = LetterRequest {
            work_unit: ctx.proposal.work_unit.clone().unwrap_or_default(),
            output_label: ctx.proposal.output_label.clone().unwrap_or_default(),
            total_budget: ctx
                .proposal
                .budget
                .map(|b| b.to_string())
                .unwrap_or_default(),
            summarizer_text: ctx.proposal.summary_text.clone().unwrap_or_default(),
            user_remarks: ctx.proposal.note.clone().unwrap_or_default(),
            llm_config: ctx.model.model_config(DEFAULT_TEMPERATURE),
        };

        let envelope: DataEnvelope<String> = agent
            .call(
                AgentEndpoint::RecommendationGenerator,
                serde_json::to_value(&request)?,
            )
            .await
            .and_then(decode_envelope)?;

        ctx.proposal.evaluation_letter_text = Some(clean_markdown(&envelope.data));
        Ok(())
    }
}
