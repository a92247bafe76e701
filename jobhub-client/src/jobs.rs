//! Registry API endpoints

use async_trait::async_trait;
use jobhub_core::domain::job::Job;
use jobhub_core::domain::service::ServiceInfo;
use jobhub_core::dto::job::JobFilter;
use uuid::Uuid;

use crate::JobsClient;
use crate::error::Result;

/// Remote operations [`await_job`](crate::await_job) relies on
///
/// Implementations need not bound their own latency; callers wrap each call
/// in a timeout.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Fetch the current snapshot of a job
    async fn get_job(&self, job_id: Uuid) -> Result<Job>;

    /// Request cancellation of a job
    async fn cancel_job(&self, job_id: Uuid) -> Result<()>;
}

impl JobsClient {
    /// Get a job by ID
    pub async fn get_job(&self, job_id: Uuid) -> Result<Job> {
        let url = format!("{}/jobs/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Request cancellation of a job
    ///
    /// Returns once the registry accepted the request, not when the job has
    /// stopped.
    pub async fn cancel_job(&self, job_id: Uuid) -> Result<()> {
        let url = format!("{}/jobs/{}/cancel", self.base_url, job_id);
        let response = self.client.patch(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Get name, version and uptime of the registry service
    pub async fn get_info(&self) -> Result<ServiceInfo> {
        let url = format!("{}/info", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List jobs matching a filter
    ///
    /// # Example
    /// ```no_run
    /// # use jobhub_client::JobsClient;
    /// # use jobhub_core::dto::job::JobFilter;
    /// # async fn example() -> jobhub_client::Result<()> {
    /// let client = JobsClient::new("http://localhost:8080");
    /// let running = client
    ///     .list_jobs(&JobFilter::default().with_status("running"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let url = format!("{}/jobs", self.base_url);
        let response = self.client.get(&url).query(filter).send().await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl JobApi for JobsClient {
    async fn get_job(&self, job_id: Uuid) -> Result<Job> {
        JobsClient::get_job(self, job_id).await
    }

    async fn cancel_job(&self, job_id: Uuid) -> Result<()> {
        JobsClient::cancel_job(self, job_id).await
    }
}
