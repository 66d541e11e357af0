//! In-memory store used by tests and database-less embedders

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{
    JobId, JobStatus, Proposal, ProposalDocument, ProposalId, ProposalJob, ProposalMapPriority,
    ProposalScoreOverlap,
};

use super::{DocumentStore, NewDocument, NewProposal, RunCommit, StoreError};

#[derive(Default)]
struct Tables {
    next_id: i64,
    proposals: HashMap<ProposalId, Proposal>,
    jobs: HashMap<JobId, ProposalJob>,
    documents: HashMap<i64, ProposalDocument>,
    map_priorities: Vec<ProposalMapPriority>,
    overlaps: Vec<ProposalScoreOverlap>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Single-mutex table set with monotonically increasing ids
///
/// Commit atomicity falls out of the mutex: a `commit_run` is applied in one
/// critical section, so a concurrent status poll sees either none or all of
/// the run's final write.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_proposal(&self, new: NewProposal) -> Result<Proposal, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let id = tables.allocate_id();
        let proposal = Proposal {
            id,
            owner_id: new.owner_id,
            category: new.category,
            sub_category: new.sub_category,
            status: "waiting".to_string(),
            note: new.note,
            output_label: None,
            work_unit: None,
            budget: None,
            verification_text: None,
            summary_text: None,
            evaluation_letter_text: None,
        };
        tables.proposals.insert(id, proposal.clone());
        Ok(proposal)
    }

    async fn create_job_with_documents(
        &self,
        proposal_id: ProposalId,
        documents: Vec<NewDocument>,
    ) -> Result<ProposalJob, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.proposals.contains_key(&proposal_id) {
            return Err(StoreError::ProposalNotFound(proposal_id));
        }

        let job_id = tables.allocate_id();
        let job = ProposalJob {
            id: job_id,
            proposal_id,
            status: JobStatus::Queue,
            total_file: documents.len() as u32,
            total_uploaded_file: 0,
            total_failed_file: 0,
            is_error: false,
            error_message: None,
            completed_at: None,
        };
        tables.jobs.insert(job_id, job.clone());

        for new_doc in documents {
            let doc_id = tables.allocate_id();
            tables.documents.insert(
                doc_id,
                ProposalDocument {
                    id: doc_id,
                    proposal_id,
                    job_id,
                    kind: new_doc.kind,
                    file_name: new_doc.file_name,
                    content_base64: new_doc.content_base64,
                    summary: None,
                },
            );
        }

        Ok(job)
    }

    async fn job(&self, id: JobId) -> Result<Option<ProposalJob>, StoreError> {
        Ok(self.inner.lock().unwrap().jobs.get(&id).cloned())
    }

    async fn documents_by_job(
        &self,
        job_id: JobId,
    ) -> Result<Vec<ProposalDocument>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut docs: Vec<_> = tables
            .documents
            .values()
            .filter(|d| d.job_id == job_id)
            .cloned()
            .collect();
        docs.sort_by_key(|d| d.id);
        Ok(docs)
    }

    async fn proposal(&self, id: ProposalId) -> Result<Option<Proposal>, StoreError> {
        Ok(self.inner.lock().unwrap().proposals.get(&id).cloned())
    }

    async fn update_job(&self, job: &ProposalJob) -> Result<(), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.jobs.contains_key(&job.id) {
            return Err(StoreError::JobNotFound(job.id));
        }
        tables.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn reset_job_for_retry(&self, id: JobId) -> Result<ProposalJob, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let job = tables
            .jobs
            .get_mut(&id)
            .ok_or(StoreError::JobNotFound(id))?;
        job.reset_for_retry();
        Ok(job.clone())
    }

    async fn map_priorities(
        &self,
        proposal_id: ProposalId,
    ) -> Result<Vec<ProposalMapPriority>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .map_priorities
            .iter()
            .filter(|p| p.proposal_id == proposal_id)
            .cloned()
            .collect())
    }

    async fn overlaps(
        &self,
        proposal_id: ProposalId,
    ) -> Result<Vec<ProposalScoreOverlap>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .overlaps
            .iter()
            .filter(|o| o.proposal_id == proposal_id)
            .cloned()
            .collect())
    }

    async fn commit_run(&self, commit: RunCommit) -> Result<(), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.jobs.contains_key(&commit.job.id) {
            return Err(StoreError::JobNotFound(commit.job.id));
        }

        let proposal_id = commit.proposal.id;
        tables.jobs.insert(commit.job.id, commit.job);
        tables.proposals.insert(proposal_id, commit.proposal);
        for doc in commit.documents {
            tables.documents.insert(doc.id, doc);
        }
        for row in commit.map_priorities {
            let id = tables.allocate_id();
            tables.map_priorities.push(ProposalMapPriority {
                id,
                proposal_id,
                label: row.label,
                score: row.score,
                reason: row.reason,
            });
        }
        for row in commit.overlaps {
            let id = tables.allocate_id();
            tables.overlaps.push(ProposalScoreOverlap {
                id,
                proposal_id,
                work_unit: row.work_unit,
                score: row.score,
                total_budget: row.total_budget,
                reason: row.reason,
                output_label: row.output_label,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassificationRef, DocumentKind};

    fn new_proposal() -> NewProposal {
        NewProposal {
            owner_id: "user-1".to_string(),
            category: ClassificationRef {
                id: 1,
                label: "Belanja Data".to_string(),
            },
            sub_category: ClassificationRef {
                id: 2,
                label: "BMA".to_string(),
            },
            note: None,
        }
    }

    #[tokio::test]
    async fn test_create_job_counts_all_documents() {
        let store = InMemoryStore::new();
        let proposal = store.create_proposal(new_proposal()).await.unwrap();
        let job = store
            .create_job_with_documents(
                proposal.id,
                vec![
                    NewDocument::from_bytes(DocumentKind::PrimaryReference, "kak.pdf", b"a"),
                    NewDocument::from_bytes(DocumentKind::BudgetDetail, "rab.pdf", b"b"),
                    NewDocument::from_bytes(DocumentKind::SupportingLetter, "sp.pdf", b"c"),
                    NewDocument::from_bytes(DocumentKind::Supplementary, "extra.pdf", b"d"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Queue);
        assert_eq!(job.total_file, 4);

        let docs = store.documents_by_job(job.id).await.unwrap();
        assert_eq!(docs.len(), 4);
        assert_eq!(docs[0].kind, DocumentKind::PrimaryReference);
        assert!(docs.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_create_job_requires_proposal() {
        let store = InMemoryStore::new();
        let result = store.create_job_with_documents(999, Vec::new()).await;
        assert!(matches!(result, Err(StoreError::ProposalNotFound(999))));
    }

    #[tokio::test]
    async fn test_reset_job_for_retry() {
        let store = InMemoryStore::new();
        let proposal = store.create_proposal(new_proposal()).await.unwrap();
        let mut job = store
            .create_job_with_documents(proposal.id, Vec::new())
            .await
            .unwrap();
        job.total_failed_file = 1;
        job.complete_with_error("summarize");
        store.update_job(&job).await.unwrap();

        let reset = store.reset_job_for_retry(job.id).await.unwrap();
        assert_eq!(reset.status, JobStatus::Queue);
        assert_eq!(reset.total_failed_file, 0);
        assert!(!reset.is_error);
    }

    #[tokio::test]
    async fn test_commit_run_assigns_derived_row_ids() {
        let store = InMemoryStore::new();
        let proposal = store.create_proposal(new_proposal()).await.unwrap();
        let job = store
            .create_job_with_documents(proposal.id, Vec::new())
            .await
            .unwrap();

        store
            .commit_run(RunCommit {
                job: job.clone(),
                proposal: proposal.clone(),
                documents: Vec::new(),
                map_priorities: vec![super::super::NewMapPriority {
                    label: "RKP-LHK".to_string(),
                    score: 85,
                    reason: "selaras".to_string(),
                }],
                overlaps: Vec::new(),
            })
            .await
            .unwrap();

        let rows = store.map_priorities(proposal.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "RKP-LHK");
        assert!(rows[0].id > 0);
    }
}
