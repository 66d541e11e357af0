//! Per-run state threaded through the stage executors
//!
//! One `RunContext` is owned by a single orchestrator invocation; there is no
//! shared mutable pipeline state. Stages mutate exactly the fields they own
//! and the orchestrator commits the result.

use crate::agent::types::ModelProfile;
use crate::model::{DocumentKind, Proposal, ProposalDocument, ProposalJob};
use crate::store::{NewMapPriority, NewScoreOverlap, RunCommit};

pub struct RunContext {
    pub proposal: Proposal,
    pub job: ProposalJob,
    pub documents: Vec<ProposalDocument>,
    /// Alignment rows accumulated by stage 3
    pub map_priorities: Vec<NewMapPriority>,
    /// Overlap rows accumulated by stage 5
    pub overlaps: Vec<NewScoreOverlap>,
    pub model: ModelProfile,
}

impl RunContext {
    pub fn new(
        proposal: Proposal,
        job: ProposalJob,
        documents: Vec<ProposalDocument>,
        model: ModelProfile,
    ) -> Self {
        Self {
            proposal,
            job,
            documents,
            map_priorities: Vec::new(),
            overlaps: Vec::new(),
            model,
        }
    }

    /// The primary-reference document driving stages 3, 4, and 5.
    pub fn primary_document(&self) -> Option<&ProposalDocument> {
        self.documents
            .iter()
            .find(|d| d.kind == DocumentKind::PrimaryReference)
    }

    /// Final write of a successful run: everything accumulated lands.
    pub fn into_success_commit(self) -> RunCommit {
        RunCommit {
            job: self.job,
            proposal: self.proposal,
            documents: self.documents,
            map_priorities: self.map_priorities,
            overlaps: self.overlaps,
        }
    }

    /// Write of an aborted run: the job's terminal error state, the documents
    /// (with any summaries already produced), and proposal fields set so far
    /// are persisted; derived rows of the failed run are dropped.
    pub fn into_abort_commit(self) -> RunCommit {
        RunCommit {
            job: self.job,
            proposal: self.proposal,
            documents: self.documents,
            map_priorities: Vec::new(),
            overlaps: Vec::new(),
        }
    }
}
