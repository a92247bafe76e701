//! Job filtering and ordering
//!
//! Pure logic behind listing: a parsed [`JobFilter`] becomes a
//! [`JobSelector`] that tests snapshots and sorts the matches.

use chrono::{DateTime, Utc};

use crate::domain::job::{Job, JobStatus, UnknownStatus};
use crate::dto::job::JobFilter;

/// Validated form of a [`JobFilter`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSelector {
    pub status: Option<JobStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub sort_desc: bool,
}

impl TryFrom<&JobFilter> for JobSelector {
    type Error = UnknownStatus;

    fn try_from(filter: &JobFilter) -> Result<Self, Self::Error> {
        let status = match filter.status.as_deref() {
            None | Some("") => None,
            Some(s) => Some(s.parse()?),
        };

        Ok(Self {
            status,
            since: filter.since,
            until: filter.until,
            sort_desc: filter.sort_desc,
        })
    }
}

impl JobSelector {
    /// Tests a snapshot against every supplied predicate
    pub fn matches(&self, job: &Job) -> bool {
        if self.since.is_some_and(|since| job.created <= since) {
            return false;
        }
        if self.until.is_some_and(|until| job.created >= until) {
            return false;
        }
        self.status.is_none_or(|status| status_matches(status, job))
    }

    /// Orders jobs by creation time, oldest first unless descending
    pub fn sort(&self, jobs: &mut [Job]) {
        if self.sort_desc {
            jobs.sort_by(|a, b| b.created.cmp(&a.created));
        } else {
            jobs.sort_by(|a, b| a.created.cmp(&b.created));
        }
    }
}

/// Status predicate used by listing
///
/// `Error` and `Ok` only exclude completed jobs with the opposite outcome,
/// so jobs that have not completed match both.
pub fn status_matches(status: JobStatus, job: &Job) -> bool {
    match status {
        JobStatus::Pending => {
            job.started.is_none() && job.canceled.is_none() && job.completed.is_none()
        }
        JobStatus::Running => {
            job.started.is_some() && job.canceled.is_none() && job.completed.is_none()
        }
        JobStatus::Canceled => job.canceled.is_some(),
        JobStatus::Completed => job.completed.is_some(),
        JobStatus::Error => job.completed.is_none() || job.error.is_some(),
        JobStatus::Ok => job.completed.is_none() || job.error.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::JobError;
    use chrono::Duration;
    use uuid::Uuid;

    fn job_at(created: DateTime<Utc>) -> Job {
        let mut job = Job::new(Uuid::new_v4(), "test");
        job.created = created;
        job
    }

    fn pending() -> Job {
        job_at(Utc::now())
    }

    fn running() -> Job {
        let mut job = pending();
        job.started = Some(Utc::now());
        job
    }

    fn completed_ok() -> Job {
        let mut job = running();
        job.result = Some(serde_json::json!("x"));
        job.completed = Some(Utc::now());
        job
    }

    fn completed_err() -> Job {
        let mut job = running();
        job.error = Some(JobError::new("boom"));
        job.completed = Some(Utc::now());
        job
    }

    fn canceled_running() -> Job {
        let mut job = running();
        job.canceled = Some(Utc::now());
        job
    }

    fn selector(status: JobStatus) -> JobSelector {
        JobSelector {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_empty_status_is_unfiltered() {
        let filter = JobFilter::default().with_status("");
        let selector = JobSelector::try_from(&filter).unwrap();
        assert_eq!(selector.status, None);
    }

    #[test]
    fn test_parse_unknown_status_fails() {
        let filter = JobFilter::default().with_status("finished");
        let err = JobSelector::try_from(&filter).unwrap_err();
        assert_eq!(err, UnknownStatus("finished".to_string()));
    }

    #[test]
    fn test_lifecycle_predicates() {
        assert!(selector(JobStatus::Pending).matches(&pending()));
        assert!(!selector(JobStatus::Pending).matches(&running()));

        assert!(selector(JobStatus::Running).matches(&running()));
        assert!(!selector(JobStatus::Running).matches(&pending()));
        assert!(!selector(JobStatus::Running).matches(&completed_ok()));
        assert!(!selector(JobStatus::Running).matches(&canceled_running()));

        assert!(selector(JobStatus::Canceled).matches(&canceled_running()));
        assert!(!selector(JobStatus::Canceled).matches(&running()));

        assert!(selector(JobStatus::Completed).matches(&completed_ok()));
        assert!(selector(JobStatus::Completed).matches(&completed_err()));
        assert!(!selector(JobStatus::Completed).matches(&running()));
    }

    #[test]
    fn test_outcome_predicates_match_incomplete_jobs() {
        assert!(selector(JobStatus::Error).matches(&completed_err()));
        assert!(!selector(JobStatus::Error).matches(&completed_ok()));
        assert!(selector(JobStatus::Error).matches(&pending()));
        assert!(selector(JobStatus::Error).matches(&running()));

        assert!(selector(JobStatus::Ok).matches(&completed_ok()));
        assert!(!selector(JobStatus::Ok).matches(&completed_err()));
        assert!(selector(JobStatus::Ok).matches(&pending()));
        assert!(selector(JobStatus::Ok).matches(&canceled_running()));
    }

    #[test]
    fn test_time_window_bounds_are_exclusive() {
        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(10);
        let selector = JobSelector {
            since: Some(t1),
            until: Some(t2),
            ..Default::default()
        };

        assert!(!selector.matches(&job_at(t1)));
        assert!(!selector.matches(&job_at(t2)));
        assert!(selector.matches(&job_at(t1 + Duration::seconds(1))));
        assert!(!selector.matches(&job_at(t1 - Duration::seconds(1))));
        assert!(!selector.matches(&job_at(t2 + Duration::seconds(1))));
    }

    #[test]
    fn test_status_and_window_combine() {
        let t1 = Utc::now() - Duration::hours(1);
        let selector = JobSelector {
            status: Some(JobStatus::Pending),
            since: Some(t1),
            ..Default::default()
        };

        assert!(selector.matches(&pending()));
        assert!(!selector.matches(&running()));
        assert!(!selector.matches(&job_at(t1 - Duration::minutes(1))));
    }

    #[test]
    fn test_sort_order() {
        let base = Utc::now();
        let mut jobs = vec![
            job_at(base + Duration::seconds(2)),
            job_at(base),
            job_at(base + Duration::seconds(1)),
        ];

        JobSelector::default().sort(&mut jobs);
        assert!(jobs.windows(2).all(|w| w[0].created < w[1].created));

        JobSelector {
            sort_desc: true,
            ..Default::default()
        }
        .sort(&mut jobs);
        assert!(jobs.windows(2).all(|w| w[0].created > w[1].created));
    }
}
