//! Configuration module
//!
//! Settings shared by all CLI commands.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the registry API
    pub url: String,
}
