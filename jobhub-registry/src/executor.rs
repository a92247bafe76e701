//! Job executor
//!
//! The registry hands every new job to an [`Executor`], which decides when
//! the job's target actually runs. [`TokioExecutor`] is the bundled
//! implementation: a bounded queue drained by a dispatcher task that keeps at
//! most `max_parallel_jobs` targets running on the tokio runtime.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ExecutorConfig;
use crate::job::JobHandle;

/// Errors returned when an executor refuses a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Too many jobs are already waiting
    #[error("executor queue is full")]
    Saturated,

    /// The executor no longer accepts jobs
    #[error("executor is shut down")]
    Closed,
}

/// Accepts jobs for asynchronous execution
///
/// An accepted job must eventually have [`JobHandle::call_target`] invoked
/// exactly once. `submit` must not block.
pub trait Executor: Send + Sync {
    fn submit(&self, job: Arc<JobHandle>) -> Result<(), ExecutorError>;
}

/// Executor backed by tokio tasks
///
/// Must be created inside a tokio runtime.
pub struct TokioExecutor {
    queue: mpsc::Sender<Arc<JobHandle>>,
    shutdown: CancellationToken,
}

impl TokioExecutor {
    /// Creates the executor and spawns its dispatcher
    ///
    /// The dispatcher stops when `shutdown` fires; jobs still queued at that
    /// point never run.
    pub fn new(config: &ExecutorConfig, shutdown: CancellationToken) -> Self {
        let (queue, rx) = mpsc::channel(config.queue_capacity.max(1));
        let slots = Arc::new(Semaphore::new(config.max_parallel_jobs.max(1)));

        info!(
            "Starting executor (max parallel jobs: {}, queue capacity: {})",
            config.max_parallel_jobs, config.queue_capacity
        );

        tokio::spawn(Self::dispatch(rx, slots, shutdown.clone()));

        Self { queue, shutdown }
    }

    async fn dispatch(
        mut rx: mpsc::Receiver<Arc<JobHandle>>,
        slots: Arc<Semaphore>,
        shutdown: CancellationToken,
    ) {
        loop {
            let job = tokio::select! {
                _ = shutdown.cancelled() => break,
                job = rx.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            let permit = tokio::select! {
                _ = shutdown.cancelled() => break,
                permit = Arc::clone(&slots).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            debug!(job_id = %job.id(), "Dispatching job");

            // the slot is released by the job's completion callback
            tokio::spawn(async move {
                job.call_target(move || drop(permit)).await;
            });
        }

        rx.close();
        info!("Executor stopped");
    }
}

impl Executor for TokioExecutor {
    fn submit(&self, job: Arc<JobHandle>) -> Result<(), ExecutorError> {
        if self.shutdown.is_cancelled() {
            return Err(ExecutorError::Closed);
        }

        self.queue.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ExecutorError::Saturated,
            mpsc::error::TrySendError::Closed(_) => ExecutorError::Closed,
        })
    }
}
