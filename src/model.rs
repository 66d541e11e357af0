//! Domain types shared by the pipeline, the store, and the status feed
//!
//! The `ProposalJob` row is the single source of truth for run progress: it is
//! mutated only by the orchestrator and read concurrently by the status
//! publisher. Everything else hangs off a `Proposal`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProposalId = i64;
pub type JobId = i64;
pub type DocumentId = i64;

/// Kind of an uploaded proposal artifact
///
/// The full-upload variant carries exactly one `PrimaryReference` (the
/// terms-of-reference document driving extraction, alignment, and overlap),
/// one `BudgetDetail`, one `SupportingLetter`, and zero or more
/// `Supplementary` attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PrimaryReference,
    BudgetDetail,
    SupportingLetter,
    Supplementary,
}

impl DocumentKind {
    /// Wire label the analysis agent expects for this kind.
    ///
    /// Supplementary attachments are sent with an empty category, matching
    /// the upstream contract.
    pub fn category_code(&self) -> &'static str {
        match self {
            DocumentKind::PrimaryReference => "KAK",
            DocumentKind::BudgetDetail => "RAB",
            DocumentKind::SupportingLetter => "SP",
            DocumentKind::Supplementary => "",
        }
    }
}

/// A classification reference joined onto the proposal by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRef {
    pub id: i64,
    pub label: String,
}

/// A budget proposal and the fields the pipeline derives for it
///
/// `status` is free text owned by the request layer; the derived fields are
/// written exclusively by the orchestrator during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub owner_id: String,
    pub category: ClassificationRef,
    pub sub_category: ClassificationRef,
    pub status: String,
    pub note: Option<String>,
    /// Output label extracted from the primary-reference document (stage 4)
    pub output_label: Option<String>,
    /// Proposing work unit extracted from the primary-reference document
    pub work_unit: Option<String>,
    /// Budget amount parsed from localized text; `None` when unparseable
    pub budget: Option<f64>,
    pub verification_text: Option<String>,
    pub summary_text: Option<String>,
    pub evaluation_letter_text: Option<String>,
}

/// One uploaded artifact, payload base64-encoded at rest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDocument {
    pub id: DocumentId,
    pub proposal_id: ProposalId,
    /// The pipeline attempt this document belongs to
    pub job_id: JobId,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_base64: String,
    /// Per-document summary, populated in stage 1
    pub summary: Option<String>,
}

/// Job state machine: `Waiting → Queue → Running → Completed`
///
/// `Completed` is the only terminal state; success and failure are
/// distinguished by the job's `is_error` flag. `Queue` is also the retry
/// entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Waiting,
    Queue,
    Running,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Waiting => "waiting",
            JobStatus::Queue => "queue",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pipeline attempt over a proposal's document set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalJob {
    pub id: JobId,
    pub proposal_id: ProposalId,
    pub status: JobStatus,
    /// Number of documents attached to this attempt
    pub total_file: u32,
    /// Documents summarized successfully in stage 1
    pub total_uploaded_file: u32,
    /// Documents whose summarization failed in stage 1
    pub total_failed_file: u32,
    pub is_error: bool,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProposalJob {
    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
    }

    /// Terminal success: clears the error flag and stamps `completed_at`.
    pub fn complete_ok(&mut self) {
        self.status = JobStatus::Completed;
        self.is_error = false;
        self.error_message = None;
        self.completed_at = Some(Utc::now());
    }

    /// Terminal failure naming the stage that aborted the run.
    pub fn complete_with_error(&mut self, stage: &str) {
        self.status = JobStatus::Completed;
        self.is_error = true;
        self.error_message = Some(stage.to_string());
        self.completed_at = Some(Utc::now());
    }

    /// Bounded reset applied by the retry operation: counters back to zero,
    /// error state cleared, status back to `Queue`. The next run starts from
    /// stage 1.
    pub fn reset_for_retry(&mut self) {
        self.status = JobStatus::Queue;
        self.total_uploaded_file = 0;
        self.total_failed_file = 0;
        self.is_error = false;
        self.error_message = None;
        self.completed_at = None;
    }

    /// Counter invariant: `uploaded + failed <= total`.
    pub fn counters_consistent(&self) -> bool {
        self.total_uploaded_file + self.total_failed_file <= self.total_file
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            status: self.status,
            completed_at: self.completed_at,
            total_file: self.total_file,
            total_uploaded_file: self.total_uploaded_file,
            total_failed_file: self.total_failed_file,
            is_error: self.is_error,
            error_message: self.error_message.clone(),
        }
    }
}

/// One status-feed emission, mirroring the job row field for field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_file: u32,
    pub total_uploaded_file: u32,
    pub total_failed_file: u32,
    pub is_error: bool,
    pub error_message: Option<String>,
}

impl JobSnapshot {
    /// Whether this snapshot is the feed's terminal emission.
    pub fn is_terminal(&self) -> bool {
        self.status == JobStatus::Completed
    }

    /// Renders the snapshot as a server-sent-event frame.
    pub fn sse_frame(&self) -> String {
        let json = serde_json::to_string(self).expect("snapshot serializes");
        format!("data: {}\n\n", json)
    }
}

/// Alignment score against one fixed reference document (stage 3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalMapPriority {
    pub id: i64,
    pub proposal_id: ProposalId,
    pub label: String,
    pub score: i64,
    pub reason: String,
}

/// One competing work unit surfaced by the overlap comparison (stage 5)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalScoreOverlap {
    pub id: i64,
    pub proposal_id: ProposalId,
    pub work_unit: String,
    pub score: i64,
    /// Parsed from localized text; `None` when the upstream amount was malformed
    pub total_budget: Option<f64>,
    pub reason: String,
    pub output_label: String,
}
