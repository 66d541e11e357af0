use anyhow::Result;
use async_trait::async_trait;

use crate::agent::AgentClient;

use super::context::RunContext;
use super::stages::{
    extraction::ExtractionStage, letter::LetterStage, map_priority::MapPriorityStage,
    overlap::OverlapStage, summarize::SummarizeStage, synthesis::SynthesisStage,
    verification::VerificationStage,
};

/// Model temperature used by every stage except per-document summarization
pub(crate) const DEFAULT_TEMPERATURE: f64 = 0.7;

/// One pipeline stage: builds its request from the run context, invokes the
/// agent, interprets the response, and mutates exactly the fields it owns.
///
/// An `Err` return aborts the pipeline; the orchestrator records the stage's
/// `name` as the job's error message. Stages with internal fan-out (1 and 3)
/// finish their fan-out before failing.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &mut RunContext, agent: &dyn AgentClient) -> Result<()>;
}

/// The fixed stage order. Not user-configurable; changing the sequence is a
/// build-time decision.
pub fn default_stages() -> Vec<Box<dyn PipelineStage>> {
    vec![
        Box::new(SummarizeStage),
        Box::new(VerificationStage),
        Box::new(MapPriorityStage),
        Box::new(ExtractionStage),
        Box::new(OverlapStage),
        Box::new(SynthesisStage),
        Box::new(LetterStage),
    ]
}
