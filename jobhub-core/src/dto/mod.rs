//! Data Transfer Objects
//!
//! Request shapes exchanged between the registry's HTTP API and its clients.

pub mod job;
