//! Remote-await
//!
//! Polls a remote registry until a job completes. Cancelling the local token
//! stops the wait and forwards a best-effort cancel request to the remote
//! job.

use std::time::Duration;

use jobhub_core::domain::job::Job;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::jobs::JobApi;

/// Polling parameters for [`await_job`]
#[derive(Debug, Clone)]
pub struct AwaitOptions {
    /// Time between two polls; the first poll happens one interval after the call
    pub poll_interval: Duration,
    /// Upper bound for every single remote request
    pub request_timeout: Duration,
}

impl Default for AwaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Waits until the remote job `job_id` has completed
///
/// Returns the first snapshot with `completed` set. Any failed or timed out
/// poll ends the wait with that error; there are no retries. When `token`
/// fires, including while a poll is in flight, one cancel request is sent to
/// the remote job and the wait ends with [`ClientError::Canceled`], whether
/// or not that request succeeded.
pub async fn await_job<A>(
    api: &A,
    job_id: Uuid,
    options: &AwaitOptions,
    token: &CancellationToken,
) -> Result<Job>
where
    A: JobApi + ?Sized,
{
    let period = options.poll_interval.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(cancel_remote(api, job_id, options).await),
            _ = ticker.tick() => {}
        }

        let polled = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(cancel_remote(api, job_id, options).await),
            polled = time::timeout(options.request_timeout, api.get_job(job_id)) => polled,
        };

        let job = polled.map_err(|_| ClientError::Timeout(options.request_timeout))??;
        if job.is_completed() {
            debug!(job_id = %job_id, "Remote job completed");
            return Ok(job);
        }

        debug!(job_id = %job_id, status = %job.status(), "Remote job not completed yet");
    }
}

/// Sends the remote cancel request and produces the error ending the wait
async fn cancel_remote<A>(api: &A, job_id: Uuid, options: &AwaitOptions) -> ClientError
where
    A: JobApi + ?Sized,
{
    debug!(job_id = %job_id, "Wait canceled, canceling remote job");

    match time::timeout(options.request_timeout, api.cancel_job(job_id)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(job_id = %job_id, "Failed to cancel remote job: {}", e),
        Err(_) => warn!(
            job_id = %job_id,
            "Failed to cancel remote job: no answer within {:?}",
            options.request_timeout
        ),
    }

    ClientError::Canceled
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory registry answering from a script of snapshots
    #[derive(Default)]
    struct FakeApi {
        answers: Mutex<VecDeque<Result<Job>>>,
        get_delay: Duration,
        cancel_fails: bool,
        cancel_hangs: bool,
        gets: AtomicUsize,
        cancels: AtomicUsize,
    }

    impl FakeApi {
        fn answering(answers: Vec<Result<Job>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl JobApi for FakeApi {
        async fn get_job(&self, job_id: Uuid) -> Result<Job> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if !self.get_delay.is_zero() {
                time::sleep(self.get_delay).await;
            }
            let answer = self.answers.lock().unwrap().pop_front();
            answer.unwrap_or_else(|| Ok(running(job_id)))
        }

        async fn cancel_job(&self, _job_id: Uuid) -> Result<()> {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            if self.cancel_hangs {
                std::future::pending::<()>().await;
            }
            if self.cancel_fails {
                return Err(ClientError::api_error(500, "cancel failed"));
            }
            Ok(())
        }
    }

    fn options(poll_ms: u64, timeout_ms: u64) -> AwaitOptions {
        AwaitOptions {
            poll_interval: Duration::from_millis(poll_ms),
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    fn running(id: Uuid) -> Job {
        let mut job = Job::new(id, "remote");
        job.started = Some(Utc::now());
        job
    }

    fn completed(id: Uuid, result: serde_json::Value) -> Job {
        let mut job = running(id);
        job.completed = Some(Utc::now());
        job.result = Some(result);
        job
    }

    #[tokio::test]
    async fn test_returns_completed_snapshot() {
        let id = Uuid::new_v4();
        let api = FakeApi::answering(vec![
            Ok(Job::new(id, "remote")),
            Ok(running(id)),
            Ok(completed(id, serde_json::json!("x"))),
        ]);

        let job = await_job(&api, id, &options(10, 100), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(job.result, Some(serde_json::json!("x")));
        assert_eq!(api.gets.load(Ordering::SeqCst), 3);
        assert_eq!(api.cancels.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_poll_waits_one_interval() {
        let id = Uuid::new_v4();
        let api = FakeApi::answering(vec![Ok(completed(id, serde_json::Value::Null))]);

        let started = std::time::Instant::now();
        await_job(&api, id, &options(50, 100), &CancellationToken::new())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_error_is_returned_without_retry() {
        let id = Uuid::new_v4();
        let api = FakeApi::answering(vec![Err(ClientError::api_error(404, "gone"))]);

        let err = await_job(&api, id, &options(10, 100), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(api.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_poll_times_out() {
        let api = FakeApi {
            get_delay: Duration::from_millis(500),
            ..Default::default()
        };

        let err = await_job(&api, Uuid::new_v4(), &options(10, 30), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(30)));
        assert_eq!(api.cancels.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_before_first_poll() {
        let api = FakeApi::default();
        let token = CancellationToken::new();
        token.cancel();

        let err = await_job(&api, Uuid::new_v4(), &options(1000, 100), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Canceled));
        assert_eq!(api.gets.load(Ordering::SeqCst), 0);
        assert_eq!(api.cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_while_poll_in_flight() {
        let api = FakeApi {
            get_delay: Duration::from_millis(1000),
            ..Default::default()
        };
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = await_job(&api, Uuid::new_v4(), &options(10, 5000), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Canceled));
        assert!(started.elapsed() < Duration::from_millis(1000));
        assert_eq!(api.gets.load(Ordering::SeqCst), 1);
        assert_eq!(api.cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_remote_cancel_still_cancels() {
        let api = FakeApi {
            cancel_fails: true,
            ..Default::default()
        };
        let token = CancellationToken::new();
        token.cancel();

        let err = await_job(&api, Uuid::new_v4(), &options(10, 100), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Canceled));
        assert_eq!(api.cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hanging_remote_cancel_is_bounded() {
        let api = FakeApi {
            cancel_hangs: true,
            ..Default::default()
        };
        let token = CancellationToken::new();
        token.cancel();

        let err = await_job(&api, Uuid::new_v4(), &options(10, 30), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Canceled));
    }
}
