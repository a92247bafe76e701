//! Jobhub Core
//!
//! Core types shared by the job registry, its HTTP API and remote clients.
//!
//! This crate contains:
//! - Domain types: the job snapshot and its derived status
//! - DTOs: the list filter exchanged over the wire
//! - Filtering: the predicate and ordering used when listing jobs

pub mod domain;
pub mod dto;
pub mod filter;
