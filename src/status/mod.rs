//! Status Publisher: polling snapshot feed for a job
//!
//! A read-only concurrent observer of the job row. The feed emits one
//! snapshot per poll and terminates after the first snapshot whose status is
//! `completed` — the terminal check runs against the snapshot just emitted,
//! never a fresh read, so the final state is always delivered. A job that is
//! already terminal yields exactly one snapshot.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use tracing::warn;

use crate::config::PipelineConfig;
use crate::model::{JobId, JobSnapshot};
use crate::store::DocumentStore;

pub struct StatusPublisher {
    store: Arc<dyn DocumentStore>,
    poll_interval: Duration,
}

struct WatchState {
    store: Arc<dyn DocumentStore>,
    job_id: JobId,
    poll_interval: Duration,
    first: bool,
    done: bool,
}

impl StatusPublisher {
    pub fn new(store: Arc<dyn DocumentStore>, config: &PipelineConfig) -> Self {
        Self::with_interval(store, config.poll_interval)
    }

    pub fn with_interval(store: Arc<dyn DocumentStore>, poll_interval: Duration) -> Self {
        Self {
            store,
            poll_interval,
        }
    }

    /// Lazy snapshot sequence for `job_id`, restartable by re-invocation.
    ///
    /// Ends without emitting if the job does not exist or the store fails.
    pub fn watch(&self, job_id: JobId) -> impl Stream<Item = JobSnapshot> + Send {
        let state = WatchState {
            store: Arc::clone(&self.store),
            job_id,
            poll_interval: self.poll_interval,
            first: true,
            done: false,
        };

        stream::unfold(state, |mut state| async move {
            if state.done {
                return None;
            }
            if !state.first {
                tokio::time::sleep(state.poll_interval).await;
            }
            state.first = false;

            let job = match state.store.job(state.job_id).await {
                Ok(Some(job)) => job,
                Ok(None) => {
                    warn!(job_id = state.job_id, "Watched job does not exist");
                    return None;
                }
                Err(err) => {
                    warn!(job_id = state.job_id, error = %err, "Status poll failed");
                    return None;
                }
            };

            let snapshot = job.snapshot();
            if snapshot.is_terminal() {
                state.done = true;
            }
            Some((snapshot, state))
        })
    }
}
