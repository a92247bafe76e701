//! Service information

use serde::{Deserialize, Serialize};

/// Identity and uptime of a running registry service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    /// Whole seconds since the service started
    pub uptime_secs: u64,
}
