//! Stage 4: structured field extraction from the primary document
//!
//! The extractor returns a key/value list; only the three recognized keys are
//! mapped onto the proposal. The budget amount arrives as localized text and
//! parses soft to `None`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::agent::types::{DataEnvelope, ExtractRequest, ExtractedField};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::{PipelineStage, DEFAULT_TEMPERATURE};
use crate::util::parse_localized_amount;

const KEY_OUTPUT_LABEL: &str = "Rincian Output";
const KEY_WORK_UNIT: &str = "Direktorat";
const KEY_TOTAL_BUDGET: &str = "Total Biaya";

pub struct ExtractionStage;

#[async_trait]
impl PipelineStage for ExtractionStage {
    fn name(&self) -> &'static str {
        "extraction"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        let primary = ctx
            .primary_document()
            .context("no primary-reference document attached to this job")?;

        let request = ExtractRequest {
            base64_data: primary.content_base64.clone(),
            filename: primary.kind.category_code().to_string(),
            raw_input: String::new(),
            llm_config: ctx.model.model_config(DEFAULT_TEMPERATURE),
        };

        let envelope: DataEnvelope<Vec<ExtractedField>> = agent
            .call(
                AgentEndpoint::ExtractFields,
                serde_json::to_value(&request)?,
            )
            .await
            .and_then(decode_envelope)?;

        for field in envelope.data {
            match field.key.as_str() {
                KEY_OUTPUT_LABEL => ctx.proposal.output_label = Some(field.value),
                KEY_WORK_UNIT => ctx.proposal.work_unit = Some(field.value),
                KEY_TOTAL_BUDGET => {
                    ctx.proposal.budget = parse_localized_amount(&field.value);
                }
                other => debug!(key = other, "Ignoring unrecognized extracted field"),
            }
        }
        Ok(())
    }
}
