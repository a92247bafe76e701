//! Core domain types
//!
//! These types describe a tracked job as seen by callers. They are shared
//! between the registry (which produces snapshots) and clients (which read
//! them back over the network).

pub mod job;
pub mod service;
