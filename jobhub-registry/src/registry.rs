//! Job registry
//!
//! Owns every job created through it and answers status queries. The map of
//! jobs has its own lock; each job's fields are guarded by the job itself, so
//! long-running targets never hold up reads of the registry.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use jobhub_core::domain::job::Job;
use jobhub_core::dto::job::JobFilter;
use jobhub_core::filter::JobSelector;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::executor::Executor;
use crate::job::{JobHandle, target_fn};

/// In-memory registry of asynchronous jobs
pub struct Registry {
    jobs: RwLock<HashMap<Uuid, Arc<JobHandle>>>,
    parent: CancellationToken,
    executor: Arc<dyn Executor>,
    config: RegistryConfig,
}

impl Registry {
    /// Creates an empty registry
    ///
    /// Every job's cancellation token is a child of `parent`, so firing it
    /// cancels all jobs at once.
    pub fn new(
        parent: CancellationToken,
        executor: Arc<dyn Executor>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            parent,
            executor,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates a job and hands it to the executor
    ///
    /// The target receives the job's cancellation token. Returns the new
    /// job's id, or `Internal` if the executor refuses the job, in which case
    /// nothing is registered.
    pub fn create<F, Fut>(&self, description: impl Into<String>, target: F) -> Result<Uuid>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let job = Arc::new(
            JobHandle::new(
                Job::new(id, description),
                self.parent.child_token(),
                target_fn(target),
            )
            .with_error_code_mapper(self.config.error_code_mapper.clone()),
        );

        let mut jobs = self.write();
        self.executor.submit(Arc::clone(&job))?;
        jobs.insert(id, job);

        debug!(job_id = %id, "Job created");
        Ok(id)
    }

    /// Returns a snapshot of one job
    pub fn get(&self, id: Uuid) -> Result<Job> {
        self.read()
            .get(&id)
            .map(|job| job.meta())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Requests cancellation of one job without waiting for it to stop
    pub fn cancel(&self, id: Uuid) -> Result<()> {
        let job = self
            .read()
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))?;

        job.cancel();
        debug!(job_id = %id, "Job cancel requested");
        Ok(())
    }

    /// Lists snapshots of all jobs matching `filter`, ordered by creation
    pub fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let selector = JobSelector::try_from(filter)?;

        let mut jobs: Vec<Job> = self
            .read()
            .values()
            .map(|job| job.meta())
            .filter(|meta| selector.matches(meta))
            .collect();

        selector.sort(&mut jobs);
        Ok(jobs)
    }

    /// Removes finished jobs created at least `max_age` ago
    ///
    /// A job is finished once it was canceled or completed. Returns the
    /// number of jobs removed. Ages beyond the representable range never
    /// match.
    pub fn purge_jobs(&self, max_age: Duration) -> Result<usize> {
        let threshold = chrono::Duration::from_std(max_age).unwrap_or(chrono::TimeDelta::MAX);
        let now = Utc::now();

        let expired: Vec<Uuid> = self
            .read()
            .iter()
            .filter_map(|(id, job)| {
                let meta = job.meta();
                let finished =
                    job.is_canceled() || meta.completed.is_some() || meta.canceled.is_some();
                (finished && now - meta.created >= threshold).then_some(*id)
            })
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let mut jobs = self.write();
        let removed = expired
            .iter()
            .filter(|id| jobs.remove(*id).is_some())
            .count();

        info!("Purged {} job(s)", removed);
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, Arc<JobHandle>>> {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, Arc<JobHandle>>> {
        self.jobs.write().unwrap_or_else(PoisonError::into_inner)
    }
}
