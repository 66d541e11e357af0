//! Stage 3: alignment scoring against the three fixed planning references
//!
//! Each reference is assessed independently; a failed reference is recorded
//! and the remaining references still run, so a partial run produces as many
//! verdicts as the agent could deliver. The stage fails afterwards if any
//! reference failed.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::agent::types::{AssessRequest, PriorityVerdict, ResultEnvelope};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::{PipelineStage, DEFAULT_TEMPERATURE};
use crate::store::NewMapPriority;

/// Planning documents every proposal is scored against, in fixed order
const ALIGNMENT_REFERENCES: [&str; 3] = ["rkp-lhk.md", "rkp-nasional.md", "rpjmn-lhk.md"];

pub struct MapPriorityStage;

#[async_trait]
impl PipelineStage for MapPriorityStage {
    fn name(&self) -> &'static str {
        "map-priority"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        let primary = ctx
            .primary_document()
            .context("no primary-reference document attached to this job")?;
        let primary_base64 = primary.content_base64.clone();
        let primary_label = primary.kind.category_code().to_string();

        // Upstream prompt context: the proposal's classification is already known.
        let free_text = format!(
            "Dokumen yang masuk sudah teridentifikasi sebagai Kategori {}, Kode KRO: {}",
            ctx.proposal.category.label, ctx.proposal.sub_category.label
        );

        let mut failed = 0usize;
        for reference in ALIGNMENT_REFERENCES {
            let label = reference
                .split('.')
                .next()
                .unwrap_or(reference)
                .to_uppercase();
            debug!(%label, "Scoring alignment reference");

            let request = AssessRequest {
                reference_document_name: reference.to_string(),
                base64_data: vec![primary_base64.clone()],
                filenames: vec![primary_label.clone()],
                llm_config: ctx.model.model_config(DEFAULT_TEMPERATURE),
                free_text: Some(free_text.clone()),
            };

            let verdict: ResultEnvelope<PriorityVerdict> = match agent
                .call(
                    AgentEndpoint::AssessDocuments,
                    serde_json::to_value(&request)?,
                )
                .await
                .and_then(decode_envelope)
            {
                Ok(verdict) => verdict,
                Err(err) => {
                    warn!(%label, error = %err, "Alignment scoring failed");
                    failed += 1;
                    continue;
                }
            };

            ctx.map_priorities.push(NewMapPriority {
                label,
                score: verdict.result.score,
                reason: verdict.result.reason,
            });
        }

        if failed > 0 {
            bail!(
                "{} of {} alignment references failed",
                failed,
                ALIGNMENT_REFERENCES.len()
            );
        }
        Ok(())
    }
}
