//! Pipeline orchestrator: fixed stage order, abort-on-failure, retry
//!
//! One `run` drives a job through the seven stages sequentially. The job row
//! is persisted at every transition and after every successful stage, so a
//! concurrent status reader always sees current progress; a stalled run is
//! externally observable as `running`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::agent::AgentClient;
use crate::config::AgentConfig;
use crate::model::{JobId, JobStatus, ProposalId, ProposalJob};
use crate::store::{DocumentStore, StoreError};

use super::context::RunContext;
use super::lease::JobLeaseRegistry;
use super::stage::default_stages;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("job {0} not found")]
    JobNotFound(JobId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("a run already holds the lease for job {0}")]
    ConflictingRun(JobId),

    #[error("job {job_id} is not retryable from status {status} (is_error={is_error})")]
    NotRetryable {
        job_id: JobId,
        status: JobStatus,
        is_error: bool,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a run ended. Stage failures are not errors at this level: they are
/// absorbed into the job's terminal state and only observable through the
/// status feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed { stage: &'static str },
}

pub struct PipelineOrchestrator {
    store: Arc<dyn DocumentStore>,
    agent: Arc<dyn AgentClient>,
    leases: Arc<JobLeaseRegistry>,
    model: crate::agent::types::ModelProfile,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        agent: Arc<dyn AgentClient>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            store,
            agent,
            leases: Arc::new(JobLeaseRegistry::new()),
            model: config.model_profile(),
        }
    }

    /// Executes one full pipeline run for `job_id`.
    ///
    /// Fails fast with [`PipelineError::ConflictingRun`] if another run holds
    /// the job's lease; in that case the job row is untouched. Every other
    /// stage-level failure ends in `Ok(RunOutcome::Failed { .. })` with the
    /// job in `completed{is_error=true}`.
    pub async fn run(&self, job_id: JobId) -> Result<RunOutcome, PipelineError> {
        let _lease = self
            .leases
            .acquire(job_id)
            .ok_or(PipelineError::ConflictingRun(job_id))?;

        let job = self
            .store
            .job(job_id)
            .await?
            .ok_or(PipelineError::JobNotFound(job_id))?;
        let documents = self.store.documents_by_job(job_id).await?;
        let proposal = self
            .store
            .proposal(job.proposal_id)
            .await?
            .ok_or(PipelineError::ProposalNotFound(job.proposal_id))?;

        info!(job_id, proposal_id = proposal.id, "Starting pipeline run");

        let mut ctx = RunContext::new(proposal, job, documents, self.model.clone());

        // Persisted before any stage executes so a stalled run shows as running.
        ctx.job.mark_running();
        self.store.update_job(&ctx.job).await?;

        for stage in default_stages() {
            info!(stage = stage.name(), job_id, "Stage started");

            if let Err(err) = stage.execute(&mut ctx, self.agent.as_ref()).await {
                warn!(
                    stage = stage.name(),
                    job_id,
                    error = %err,
                    "Stage failed, aborting run"
                );
                let stage_name = stage.name();
                ctx.job.complete_with_error(stage_name);
                self.store.commit_run(ctx.into_abort_commit()).await?;
                return Ok(RunOutcome::Failed { stage: stage_name });
            }

            // Make counters and stage progress observable to the status feed.
            self.store.update_job(&ctx.job).await?;
            debug!(stage = stage.name(), job_id, "Stage complete");
        }

        ctx.job.complete_ok();
        self.store.commit_run(ctx.into_success_commit()).await?;
        info!(job_id, "Pipeline run completed");
        Ok(RunOutcome::Completed)
    }

    /// Launches `run` as a detached background task so the trigger can return
    /// immediately with the job id. Errors that prevent the run from starting
    /// are logged; stage failures end up in the job row as usual.
    pub fn spawn_run(self: &Arc<Self>, job_id: JobId) -> tokio::task::JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            match orchestrator.run(job_id).await {
                Ok(RunOutcome::Completed) => {}
                Ok(RunOutcome::Failed { stage }) => {
                    info!(job_id, stage, "Background run ended with a failed stage");
                }
                Err(err) => {
                    warn!(job_id, error = %err, "Background run could not execute");
                }
            }
        })
    }

    /// Retry operation: allowed only on a job that completed with an error.
    ///
    /// Applies the bounded reset (counters to zero, error state cleared,
    /// status back to `queue`) and returns the reset row. The caller then
    /// re-triggers execution with [`run`](Self::run) or
    /// [`spawn_run`](Self::spawn_run); the new run starts from stage 1, not
    /// from the failed stage.
    pub async fn retry(&self, job_id: JobId) -> Result<ProposalJob, PipelineError> {
        let job = self
            .store
            .job(job_id)
            .await?
            .ok_or(PipelineError::JobNotFound(job_id))?;

        if job.status != JobStatus::Completed || !job.is_error {
            return Err(PipelineError::NotRetryable {
                job_id,
                status: job.status,
                is_error: job.is_error,
            });
        }

        let reset = self.store.reset_job_for_retry(job_id).await?;
        info!(job_id, "Job reset for retry");
        Ok(reset)
    }
}
