//! In-process asynchronous job registry
//!
//! Hosts create jobs from async target functions, query and cancel them, and
//! purge finished jobs after a retention window. The [`api`] module exposes
//! the registry over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod info;
pub mod job;
pub mod purge;
pub mod registry;

pub use config::{ErrorCodeMapper, ExecutorConfig, PurgeConfig, RegistryConfig};
pub use error::{RegistryError, Result};
pub use executor::{Executor, ExecutorError, TokioExecutor};
pub use info::ServiceInfoProvider;
pub use job::{JobHandle, TargetFn, target_fn};
pub use purge::PurgeDriver;
pub use registry::Registry;
