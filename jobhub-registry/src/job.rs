//! Job state holder
//!
//! A [`JobHandle`] owns one job's metadata behind its own lock, together with
//! the target function and its cancellation token. The executor drives it
//! through [`JobHandle::call_target`]; readers take snapshots with
//! [`JobHandle::meta`] at any time, including while the target is running.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use jobhub_core::domain::job::{Job, JobError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ErrorCodeMapper;

/// Future returned by a target function
pub type TargetFuture = Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send>>;

/// Boxed unit of work wrapped by a job
///
/// Receives the job's cancellation token. Calling `cancel()` on it cancels
/// the job from inside.
pub type TargetFn = Box<dyn FnOnce(CancellationToken) -> TargetFuture + Send>;

/// Boxes a closure into a [`TargetFn`]
pub fn target_fn<F, Fut>(f: F) -> TargetFn
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
{
    Box::new(move |token| Box::pin(f(token)))
}

/// A tracked job and its execution handles
pub struct JobHandle {
    id: Uuid,
    meta: RwLock<Job>,
    token: CancellationToken,
    target: Mutex<Option<TargetFn>>,
    error_code_mapper: Option<ErrorCodeMapper>,
}

impl JobHandle {
    /// Creates a handle around a pending job snapshot
    pub fn new(meta: Job, token: CancellationToken, target: TargetFn) -> Self {
        Self {
            id: meta.id,
            meta: RwLock::new(meta),
            token,
            target: Mutex::new(Some(target)),
            error_code_mapper: None,
        }
    }

    pub fn with_error_code_mapper(mut self, mapper: Option<ErrorCodeMapper>) -> Self {
        self.error_code_mapper = mapper;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs the target function and records its outcome
    ///
    /// Stamps `started`, awaits the target with no lock held, then stamps
    /// either `error` or `result` followed by `completed`, and finally calls
    /// `on_done`. Only the first call runs the target; later calls return
    /// without touching the job or calling `on_done`.
    pub async fn call_target<F: FnOnce()>(&self, on_done: F) {
        let target = self
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(target) = target else {
            warn!(job_id = %self.id, "job target already called");
            return;
        };

        debug!(job_id = %self.id, "job starting");
        self.write().started = Some(Utc::now());

        // a panicking target, including one panicking before it returns its
        // future, is recorded as a failure instead of leaving the job running
        let token = self.token.clone();
        let outcome = match tokio::spawn(async move { target(token).await }).await {
            Ok(outcome) => outcome,
            Err(err) => Err(anyhow::anyhow!("job target panicked: {}", err)),
        };

        {
            let mut meta = self.write();
            match outcome {
                Ok(value) => meta.result = Some(value),
                Err(err) => {
                    warn!(job_id = %self.id, "job got error: {:#}", err);
                    meta.error = Some(JobError {
                        message: format!("{:#}", err),
                        code: self.error_code_mapper.as_ref().and_then(|map| map(&err)),
                    });
                }
            }
            meta.completed = Some(Utc::now());
        }

        debug!(job_id = %self.id, "job completed");
        on_done();
    }

    /// Requests cancellation
    ///
    /// Fires the token and stamps `canceled` the first time. Does not wait
    /// for the target function to stop.
    pub fn cancel(&self) {
        self.token.cancel();
        let mut meta = self.write();
        if meta.canceled.is_none() {
            meta.canceled = Some(Utc::now());
        }
    }

    /// Whether the cancellation token has fired
    ///
    /// True also when the registry's parent token fired or the target
    /// canceled itself, even if `canceled` was never stamped.
    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Point-in-time copy of the job's metadata
    pub fn meta(&self) -> Job {
        self.read().clone()
    }

    /// Shifts the creation time into the past
    #[cfg(test)]
    pub(crate) fn backdate(&self, age: chrono::Duration) {
        self.write().created -= age;
    }

    fn read(&self) -> RwLockReadGuard<'_, Job> {
        self.meta.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Job> {
        self.meta.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("meta", &*self.read())
            .field("canceled", &self.is_canceled())
            .finish()
    }
}
