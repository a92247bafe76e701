//! Error types for the job registry

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors returned by [`Registry`](crate::Registry) operations
///
/// Failures of a job's own target function are never reported here; they are
/// recorded on the job snapshot instead.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No job with this id is registered
    #[error("{0} not found")]
    NotFound(Uuid),

    /// Caller supplied an unusable argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The registry could not carry out the request
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<jobhub_core::domain::job::UnknownStatus> for RegistryError {
    fn from(err: jobhub_core::domain::job::UnknownStatus) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<crate::executor::ExecutorError> for RegistryError {
    fn from(err: crate::executor::ExecutorError) -> Self {
        Self::Internal(err.to_string())
    }
}
