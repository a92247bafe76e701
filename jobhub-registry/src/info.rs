//! Service information
//!
//! Reports the name and version a host runs under and how long it has been up.

use std::time::Instant;

use jobhub_core::domain::service::ServiceInfo;

/// Source of [`ServiceInfo`] snapshots
///
/// Uptime is measured from the moment the provider was created.
#[derive(Debug, Clone)]
pub struct ServiceInfoProvider {
    name: String,
    version: String,
    started: Instant,
}

impl ServiceInfoProvider {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

impl Default for ServiceInfoProvider {
    /// Names the service after this crate
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_reports_identity() {
        let provider = ServiceInfoProvider::new("billing", "2.1.0");
        let info = provider.info();
        assert_eq!(info.name, "billing");
        assert_eq!(info.version, "2.1.0");
        assert_eq!(info.uptime_secs, 0);
    }

    #[test]
    fn test_default_uses_crate_identity() {
        let provider = ServiceInfoProvider::default();
        assert_eq!(provider.name(), "jobhub-registry");
        assert_eq!(provider.version(), env!("CARGO_PKG_VERSION"));
    }
}
