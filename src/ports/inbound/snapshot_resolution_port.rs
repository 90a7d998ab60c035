use crate::application::dto::SnapshotRequest;
use crate::shared::Result;
use crate::snapshot::domain::AppSnapshot;
use async_trait::async_trait;
use std::sync::Arc;

/// SnapshotResolutionPort - Inbound port for the snapshot resolution use case
///
/// Every front end (CLI, HTTP endpoint) resolves snapshots through this port
/// so the deployment chain is walked in exactly one place.
#[async_trait]
pub trait SnapshotResolutionPort: Send + Sync {
    /// Resolves the snapshot of one application environment
    ///
    /// Calling this twice within the cache TTL with no stale requested
    /// section returns the same shared snapshot without touching the gateway.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The application or environment is not defined
    /// - The definition cannot be read or is invalid
    /// - Resolution exceeds the request deadline
    ///
    /// Infrastructure lookup failures are never errors; they surface as
    /// sentinel values inside the returned snapshot.
    async fn resolve_snapshot(&self, request: SnapshotRequest) -> Result<Arc<AppSnapshot>>;
}
