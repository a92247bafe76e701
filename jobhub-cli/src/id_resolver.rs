//! ID resolver module
//!
//! Resolves job ID prefixes to full UUIDs by listing the registry's jobs, so
//! users can type short, unambiguous prefixes instead of full UUIDs.

use anyhow::{Context, Result, anyhow};
use jobhub_client::JobsClient;
use jobhub_core::domain::job::Job;
use jobhub_core::dto::job::JobFilter;
use uuid::Uuid;

use crate::types::JobRef;

/// Resolve a job ID or prefix to a full UUID
///
/// A full UUID is returned as is, without asking the registry whether it
/// exists.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_job_id(client: &JobsClient, job: &JobRef) -> Result<Uuid> {
    let prefix = match job {
        JobRef::Id(uuid) => return Ok(*uuid),
        JobRef::Prefix(prefix) => prefix,
    };

    let jobs = client
        .list_jobs(&JobFilter::default())
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    tracing::debug!("Resolving prefix '{}' among {} job(s)", prefix, jobs.len());
    match_prefix(&jobs, prefix)
}

fn match_prefix(jobs: &[Job], prefix: &str) -> Result<Uuid> {
    let matches: Vec<_> = jobs
        .iter()
        .filter(|j| j.id.to_string().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No job found with ID starting with '{}'", prefix)),
        [job] => Ok(job.id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|j| j.id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}
