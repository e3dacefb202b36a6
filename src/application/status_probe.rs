// Probe transport seam
use crate::domain::status::ProbeReading;
use async_trait::async_trait;

/// One reachability check for a single entry against the external checking
/// service. Pure I/O boundary, no internal state; the scheduler owns all
/// retry and failure policy.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Check a single entry id. Non-2xx responses and transport failures
    /// surface as errors; callers map them to an `unknown` status.
    async fn check_entry(&self, entry_id: &str) -> anyhow::Result<ProbeReading>;
}
