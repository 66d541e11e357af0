//! Stage 5: overlap comparison against the activity vector index

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::agent::types::{OverlapEntry, OverlapRequest, ResultEnvelope};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::{PipelineStage, DEFAULT_TEMPERATURE};
use crate::store::NewScoreOverlap;
use crate::util::parse_localized_amount;

pub struct OverlapStage;

#[async_trait]
impl PipelineStage for OverlapStage {
    fn name(&self) -> &'static str {
        "overlap"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        let primary = ctx
            .primary_document()
            .context("no primary-reference document attached to this job")?;

        let request = OverlapRequest {
            raw_input: primary.summary.clone().unwrap_or_default(),
            base64_data: primary.content_base64.clone(),
            llm_config: ctx.model.model_config(DEFAULT_TEMPERATURE),
        };

        let envelope: ResultEnvelope<Vec<OverlapEntry>> = agent
            .call(
                AgentEndpoint::OverlapComparator,
                serde_json::to_value(&request)?,
            )
            .await
            .and_then(decode_envelope)?;

        for entry in envelope.result {
            ctx.overlaps.push(NewScoreOverlap {
                work_unit: entry.work_unit,
                score: entry.score,
                total_budget: parse_localized_amount(&entry.total_budget),
                reason: entry.reason,
                output_label: entry.output_label,
            });
        }
        Ok(())
    }
}
