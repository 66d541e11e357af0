//! Exclusive per-job run leases
//!
//! Two concurrent runs against the same job id (a retry fired while a prior
//! run is still executing) would interleave writes to the job row. The
//! registry hands out at most one lease per job id; the orchestrator acquires
//! it before the `queue → running` transition and the lease releases itself
//! when the run's guard drops.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::model::JobId;

#[derive(Default)]
pub struct JobLeaseRegistry {
    held: Mutex<HashSet<JobId>>,
}

impl JobLeaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` if a lease for `job_id` is already held.
    pub fn acquire(self: &Arc<Self>, job_id: JobId) -> Option<JobLease> {
        let mut held = self.held.lock().unwrap();
        if !held.insert(job_id) {
            return None;
        }
        Some(JobLease {
            registry: Arc::clone(self),
            job_id,
        })
    }

    pub fn is_held(&self, job_id: JobId) -> bool {
        self.held.lock().unwrap().contains(&job_id)
    }
}

/// RAII guard: dropping it releases the lease.
pub struct JobLease {
    registry: Arc<JobLeaseRegistry>,
    job_id: JobId,
}

impl Drop for JobLease {
    fn drop(&mut self) {
        self.registry.held.lock().unwrap().remove(&self.job_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_refused_until_drop() {
        let registry = Arc::new(JobLeaseRegistry::new());

        let lease = registry.acquire(7).expect("first acquire");
        assert!(registry.is_held(7));
        assert!(registry.acquire(7).is_none());

        // A different job id is unaffected.
        let other = registry.acquire(8).expect("other job");
        drop(other);

        drop(lease);
        assert!(!registry.is_held(7));
        assert!(registry.acquire(7).is_some());
    }
}
