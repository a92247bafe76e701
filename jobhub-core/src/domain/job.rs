//! Job domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Point-in-time snapshot of a tracked job
///
/// Produced by the registry, serialized by the HTTP API and read back by
/// remote clients. Never carries execution handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub description: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canceled: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JobError>,
}

impl Job {
    /// Creates a pending job snapshot stamped with the current time
    pub fn new(id: Uuid, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            created: Utc::now(),
            started: None,
            completed: None,
            canceled: None,
            result: None,
            error: None,
        }
    }

    /// Derived lifecycle status
    ///
    /// Completion wins over cancellation: a job canceled after it already
    /// finished still reports `Completed`.
    pub fn status(&self) -> JobStatus {
        if self.completed.is_some() {
            JobStatus::Completed
        } else if self.canceled.is_some() {
            JobStatus::Canceled
        } else if self.started.is_some() {
            JobStatus::Running
        } else {
            JobStatus::Pending
        }
    }

    /// Outcome of a completed job, `None` while it has not completed
    pub fn succeeded(&self) -> Option<bool> {
        self.completed.map(|_| self.error.is_none())
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

/// Error recorded when a job's target function fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Job status as used for filtering
///
/// `Pending`, `Running`, `Canceled` and `Completed` are lifecycle states;
/// `Error` and `Ok` select on the completion outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Canceled,
    Completed,
    Error,
    Ok,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Canceled,
        JobStatus::Completed,
        JobStatus::Error,
        JobStatus::Ok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Canceled => "canceled",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
            JobStatus::Ok => "ok",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a status string that names no known status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
