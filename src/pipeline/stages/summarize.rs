//! Stage 1: per-document summarization
//!
//! The only stage with per-item failure tolerance: a failed document bumps
//! `total_failed_file` and the loop moves on, so the counters report every
//! document's fate. The stage as a whole still fails afterwards if anything
//! failed, because later stages depend on the full summary set.

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::agent::types::{DataEnvelope, SummarizeRequest};
use crate::agent::{decode_envelope, AgentClient, AgentEndpoint};
use crate::pipeline::context::RunContext;
use crate::pipeline::stage::PipelineStage;

const SUMMARY_TEMPERATURE: f64 = 1.0;

pub struct SummarizeStage;

#[async_trait]
impl PipelineStage for SummarizeStage {
    fn name(&self) -> &'static str {
        "summarize"
    }

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()> {
        for index in 0..ctx.documents.len() {
            let request = {
                let doc = &ctx.documents[index];
                debug!(file = %doc.file_name, "Summarizing document");
                SummarizeRequest {
                    base64_data: doc.content_base64.clone(),
                    filename: doc.file_name.clone(),
                    raw_input: String::new(),
                    category: doc.kind.category_code().to_string(),
                    llm_config: ctx.model.model_config(SUMMARY_TEMPERATURE),
                }
            };

            let summary = match agent
                .call(AgentEndpoint::ParseSingle, serde_json::to_value(&request)?)
                .await
                .and_then(decode_envelope::<DataEnvelope<String>>)
            {
                Ok(envelope) => envelope.data,
                Err(err) => {
                    warn!(
                        file = %ctx.documents[index].file_name,
                        error = %err,
                        "Document summarization failed"
                    );
                    ctx.job.total_failed_file += 1;
                    continue;
                }
            };

            ctx.documents[index].summary = Some(summary);
            ctx.job.total_uploaded_file += 1;
        }

        if ctx.job.total_failed_file > 0 {
            bail!(
                "{} of {} documents failed to summarize",
                ctx.job.total_failed_file,
                ctx.job.total_file
            );
        }
        Ok(())
    }
}
