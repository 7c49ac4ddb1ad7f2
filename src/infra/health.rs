//! Liveness probes for backing services.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A dependency that can report whether it is reachable.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Short name used in the health report
    fn name(&self) -> &'static str;

    /// `Err` carries a human-readable reason
    async fn ping(&self) -> Result<(), String>;
}
