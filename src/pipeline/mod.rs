//! The seven-stage evaluation pipeline
//!
//! Stage order and count are fixed at build time; the orchestrator is a
//! uniform loop over boxed stage objects. See [`orchestrator`] for the state
//! machine and abort policy.

mod context;
mod lease;
mod orchestrator;
mod stage;
mod stages;

pub use context::RunContext;
pub use lease::{JobLease, JobLeaseRegistry};
pub use orchestrator::{PipelineError, PipelineOrchestrator, RunOutcome};
pub use stage::{default_stages, PipelineStage};
