//! preclear - multi-stage document-evaluation pipeline for budget
//! pre-clearance proposals
//!
//! Uploaded documents attached to a proposal are driven through a fixed,
//! ordered sequence of calls to an external analysis agent, accumulating
//! per-document summaries, alignment scores, overlap findings, extracted
//! fields, a synthesized narrative, and an evaluation letter, while a
//! polling status feed reports live progress to clients.
//!
//! # Core Concepts
//!
//! - **Job**: one pipeline attempt over a proposal's document set, with a
//!   `waiting → queue → running → completed` state machine and per-document
//!   success/failure counters
//! - **Stage**: one analysis-agent call type with a fixed request shape and a
//!   defined mutation of the run state on success
//! - **Abort**: any stage failure (after stage-internal fan-out completes)
//!   short-circuits the remaining stages and marks the job terminal with an
//!   error naming the stage
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use preclear::{
//!     AgentConfig, DocumentStore, HttpAgentClient, InMemoryStore,
//!     PipelineOrchestrator, StatusPublisher,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AgentConfig::default();
//! config.validate()?;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let agent = Arc::new(HttpAgentClient::new(&config));
//! let orchestrator = Arc::new(PipelineOrchestrator::new(store.clone(), agent, &config));
//!
//! // Ingestion created the job in `queue`; fire the run and return the id.
//! orchestrator.spawn_run(job_id);
//!
//! // A separate request streams progress until the job completes.
//! let publisher = StatusPublisher::new(store, &Default::default());
//! let feed = publisher.watch(job_id);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod status;
pub mod store;
pub mod util;

pub use agent::{AgentClient, AgentEndpoint, AgentError, HttpAgentClient, MockAgentClient};
pub use config::{AgentConfig, ConfigError, PipelineConfig};
pub use model::{
    DocumentKind, JobId, JobSnapshot, JobStatus, Proposal, ProposalDocument, ProposalJob,
    ProposalMapPriority, ProposalScoreOverlap,
};
pub use pipeline::{PipelineError, PipelineOrchestrator, RunOutcome};
pub use status::StatusPublisher;
pub use store::{DocumentStore, InMemoryStore, NewDocument, NewProposal, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
