use async_trait::async_trait;

use crate::error::SinkError;
use crate::visit::VisitRecord;

/// Append-only destination for visit records.
///
/// Implementations are constructed once at startup and shared across
/// requests, so they must be safe to call concurrently. Row order across
/// concurrent appends is not guaranteed.
#[async_trait]
pub trait VisitSink: Send + Sync {
    /// Append one record. A single attempt; callers decide what a failure
    /// means for them.
    async fn append(&self, record: &VisitRecord) -> Result<(), SinkError>;

    /// Human-readable name of the destination, for startup and health output.
    fn describe(&self) -> String;
}
