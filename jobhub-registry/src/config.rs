//! Registry configuration
//!
//! Defines the tunables of the bundled executor and the purge driver, plus
//! the optional hook that turns a failed job's error into a numeric code.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Maps a target function's error to the code stored on the job
pub type ErrorCodeMapper = Arc<dyn Fn(&anyhow::Error) -> Option<i32> + Send + Sync>;

/// Settings for the bundled [`TokioExecutor`](crate::TokioExecutor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Max target functions running at the same time
    pub max_parallel_jobs: usize,

    /// Jobs that may wait for a free slot before submission is refused
    pub queue_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_parallel_jobs: 4,
            queue_capacity: 64,
        }
    }
}

/// Settings for the [`PurgeDriver`](crate::PurgeDriver)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeConfig {
    /// How often finished jobs are purged
    pub interval: Duration,

    /// Minimum age, measured from creation, of a purged job
    pub max_age: Duration,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_age: Duration::from_secs(3600),
        }
    }
}

/// Registry configuration
#[derive(Clone, Default)]
pub struct RegistryConfig {
    pub executor: ExecutorConfig,
    pub purge: PurgeConfig,

    /// Optional hook filling [`JobError::code`](jobhub_core::domain::job::JobError)
    pub error_code_mapper: Option<ErrorCodeMapper>,
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("executor", &self.executor)
            .field("purge", &self.purge)
            .field("error_code_mapper", &self.error_code_mapper.is_some())
            .finish()
    }
}

impl RegistryConfig {
    /// Creates configuration from environment variables
    ///
    /// Recognized variables, each optional:
    /// - JOBHUB_MAX_PARALLEL_JOBS (default: 4)
    /// - JOBHUB_QUEUE_CAPACITY (default: 64)
    /// - JOBHUB_PURGE_INTERVAL (seconds, default: 60)
    /// - JOBHUB_PURGE_MAX_AGE (seconds, default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_parallel_jobs = env_parse::<usize>("JOBHUB_MAX_PARALLEL_JOBS")
            .unwrap_or(defaults.executor.max_parallel_jobs);

        let queue_capacity = env_parse::<usize>("JOBHUB_QUEUE_CAPACITY")
            .unwrap_or(defaults.executor.queue_capacity);

        let interval = env_parse::<u64>("JOBHUB_PURGE_INTERVAL")
            .map(Duration::from_secs)
            .unwrap_or(defaults.purge.interval);

        let max_age = env_parse::<u64>("JOBHUB_PURGE_MAX_AGE")
            .map(Duration::from_secs)
            .unwrap_or(defaults.purge.max_age);

        Self {
            executor: ExecutorConfig {
                max_parallel_jobs,
                queue_capacity,
            },
            purge: PurgeConfig { interval, max_age },
            error_code_mapper: None,
        }
    }

    /// Installs the error code hook
    pub fn with_error_code_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&anyhow::Error) -> Option<i32> + Send + Sync + 'static,
    {
        self.error_code_mapper = Some(Arc::new(mapper));
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.executor.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        if self.executor.queue_capacity == 0 {
            anyhow::bail!("queue_capacity must be greater than 0");
        }

        if self.purge.interval.is_zero() {
            anyhow::bail!("purge interval must be greater than 0");
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}
