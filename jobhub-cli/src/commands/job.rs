//! Job command handlers
//!
//! Handles listing, viewing, canceling and awaiting jobs.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::*;
use jobhub_client::{AwaitOptions, ClientError, JobsClient, await_job};
use jobhub_core::domain::job::{Job, JobStatus};
use jobhub_core::dto::job::JobFilter;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::types::JobRef;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List jobs
    List {
        /// Only jobs in this status (pending, running, canceled, completed, error, ok)
        #[arg(long)]
        status: Option<String>,

        /// Only jobs created after this RFC 3339 instant
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Only jobs created before this RFC 3339 instant
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Newest first
        #[arg(long)]
        desc: bool,
    },
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: JobRef,
    },
    /// Request cancellation of a job
    Cancel {
        /// Job ID or unambiguous prefix
        id: JobRef,
    },
    /// Wait until a job completes
    Await {
        /// Job ID or unambiguous prefix
        id: JobRef,

        /// Time between polls in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Timeout for each request in milliseconds
        #[arg(long, default_value_t = 10000)]
        timeout_ms: u64,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = JobsClient::new(&config.url);

    match command {
        JobCommands::List {
            status,
            since,
            until,
            desc,
        } => {
            let filter = JobFilter {
                status,
                since,
                until,
                sort_desc: desc,
            };
            list_jobs(&client, &filter).await
        }
        JobCommands::Get { id } => get_job(&client, &id).await,
        JobCommands::Cancel { id } => cancel_job(&client, &id).await,
        JobCommands::Await {
            id,
            interval_ms,
            timeout_ms,
        } => {
            let options = AwaitOptions {
                poll_interval: Duration::from_millis(interval_ms),
                request_timeout: Duration::from_millis(timeout_ms),
            };
            wait_for_job(&client, &id, &options).await
        }
    }
}

/// List jobs matching a filter
async fn list_jobs(client: &JobsClient, filter: &JobFilter) -> Result<()> {
    let jobs = client.list_jobs(filter).await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}

/// Get and display a single job
async fn get_job(client: &JobsClient, id: &JobRef) -> Result<()> {
    let uuid = resolve_job_id(client, id).await?;

    let job = client.get_job(uuid).await?;

    print_job_details(&job);

    Ok(())
}

async fn cancel_job(client: &JobsClient, id: &JobRef) -> Result<()> {
    let uuid = resolve_job_id(client, id).await?;

    client.cancel_job(uuid).await?;

    println!("{} Cancellation requested for job {}", "✓".green(), uuid);
    Ok(())
}

/// Poll a job until it completes
///
/// Ctrl-C stops waiting and asks the registry to cancel the job.
async fn wait_for_job(
    client: &JobsClient,
    id: &JobRef,
    options: &AwaitOptions,
) -> Result<()> {
    let uuid = resolve_job_id(client, id).await?;

    let token = CancellationToken::new();
    let interrupt = token.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    println!("{}", format!("Waiting for job {}...", uuid).dimmed());
    let outcome = await_job(client, uuid, options, &token).await;
    watcher.abort();

    match outcome {
        Ok(job) => {
            print_job_details(&job);
            Ok(())
        }
        Err(ClientError::Canceled) => {
            println!("{}", "Wait interrupted, cancellation requested.".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print a one-entry job summary
fn print_job_summary(job: &Job) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    println!("    Description: {}", job.description);
    println!("    Status:      {}", colorize_status(job));
    println!(
        "    Created:     {}",
        job.created
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.to_string().cyan());
    println!("  Description: {}", job.description);
    println!("  Status:      {}", colorize_status(job));
    println!("  Created:     {}", job.created.format("%Y-%m-%d %H:%M:%S"));

    if let Some(started) = job.started {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(canceled) = job.canceled {
        println!("  Canceled:    {}", canceled.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(completed) = job.completed {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = job.started {
            let duration = completed.signed_duration_since(started);
            println!("  Duration:    {}ms", duration.num_milliseconds());
        }
    }

    if let Some(result) = &job.result {
        println!("\n{}", "Result:".bold());
        match serde_json::to_string_pretty(result) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{:?}", result),
        }
    }

    if let Some(error) = &job.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.message.red());
        if let Some(code) = error.code {
            println!("  Code: {}", code);
        }
    }
}

/// Status shown to users; failed completions are marked
fn status_label(job: &Job) -> String {
    match (job.status(), job.succeeded()) {
        (JobStatus::Completed, Some(false)) => "completed (error)".to_string(),
        (status, _) => status.to_string(),
    }
}

/// Colorize job status for display
fn colorize_status(job: &Job) -> ColoredString {
    let label = status_label(job);
    match job.status() {
        JobStatus::Pending => label.yellow(),
        JobStatus::Running => label.cyan(),
        JobStatus::Canceled => label.dimmed(),
        _ if job.succeeded() == Some(false) => label.red(),
        _ => label.green(),
    }
}
