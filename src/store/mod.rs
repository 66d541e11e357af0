//! Document Store Adapter
//!
//! The pipeline talks to persistence exclusively through [`DocumentStore`]:
//! ingestion writes, the orchestrator's per-stage job updates, the final
//! transactional [`commit_run`](DocumentStore::commit_run), and the status
//! publisher's read-only polling. [`InMemoryStore`] implements the trait for
//! tests and for embedders that bring no database.

mod memory;

use async_trait::async_trait;
use base64::Engine;
use thiserror::Error;

use crate::model::{
    DocumentKind, JobId, Proposal, ProposalDocument, ProposalId, ProposalJob,
    ProposalMapPriority, ProposalScoreOverlap,
};

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("job {0} not found")]
    JobNotFound(JobId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A proposal as submitted by the request layer, before the store assigns ids
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub owner_id: String,
    pub category: crate::model::ClassificationRef,
    pub sub_category: crate::model::ClassificationRef,
    pub note: Option<String>,
}

/// One uploaded file, already base64-encoded
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_base64: String,
}

impl NewDocument {
    /// Encodes raw file bytes for at-rest storage.
    pub fn from_bytes(kind: DocumentKind, file_name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            content_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// Alignment row accumulated during a run, ids assigned at commit
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewMapPriority {
    pub label: String,
    pub score: i64,
    pub reason: String,
}

/// Overlap row accumulated during a run, ids assigned at commit
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewScoreOverlap {
    pub work_unit: String,
    pub score: i64,
    pub total_budget: Option<f64>,
    pub reason: String,
    pub output_label: String,
}

/// Everything a finished (or aborted) run writes in one logical unit
#[derive(Debug, Clone)]
pub struct RunCommit {
    pub job: ProposalJob,
    pub proposal: Proposal,
    pub documents: Vec<ProposalDocument>,
    pub map_priorities: Vec<NewMapPriority>,
    pub overlaps: Vec<NewScoreOverlap>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_proposal(&self, new: NewProposal) -> Result<Proposal, StoreError>;

    /// Persists the attempt's documents and its job row, created in `Queue`
    /// with `total_file` set to the number of documents.
    async fn create_job_with_documents(
        &self,
        proposal_id: ProposalId,
        documents: Vec<NewDocument>,
    ) -> Result<ProposalJob, StoreError>;

    async fn job(&self, id: JobId) -> Result<Option<ProposalJob>, StoreError>;

    async fn documents_by_job(&self, job_id: JobId)
        -> Result<Vec<ProposalDocument>, StoreError>;

    /// Reads a proposal with its classification labels joined in.
    async fn proposal(&self, id: ProposalId) -> Result<Option<Proposal>, StoreError>;

    /// Persists the job row alone; used by the orchestrator to make progress
    /// externally observable between stages.
    async fn update_job(&self, job: &ProposalJob) -> Result<(), StoreError>;

    /// Applies the bounded retry reset (counters, error state, `Queue`) and
    /// returns the updated row.
    async fn reset_job_for_retry(&self, id: JobId) -> Result<ProposalJob, StoreError>;

    async fn map_priorities(
        &self,
        proposal_id: ProposalId,
    ) -> Result<Vec<ProposalMapPriority>, StoreError>;

    async fn overlaps(
        &self,
        proposal_id: ProposalId,
    ) -> Result<Vec<ProposalScoreOverlap>, StoreError>;

    /// Transactional boundary for the final write of a pipeline run: job,
    /// proposal, documents, and derived rows land together.
    async fn commit_run(&self, commit: RunCommit) -> Result<(), StoreError>;
}
