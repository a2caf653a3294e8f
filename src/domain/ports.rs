use crate::domain::model::{Platform, ProbeOutcome, ResultRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One existence check against a platform. Implementations never fail;
/// transport problems come back as `Classification::TransportError`.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn classify(&self, platform: Platform, handle: &str) -> ProbeOutcome;
}

/// Destination for result records, written as each probe completes.
pub trait ResultSink {
    fn append(&mut self, record: &ResultRecord) -> Result<()>;
}
