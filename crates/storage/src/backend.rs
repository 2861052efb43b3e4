use crate::StorageError;
use mcpulse_models::ProbeKind;

/// Optional persistence collaborator. Additions are write-through on first
/// successful probe, removals follow evictions, and `load_addresses`
/// repopulates the refresh set at startup. Failures here are never allowed
/// to affect cache semantics; callers log and move on.
#[async_trait::async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Record a newly observed address for a probe kind.
    async fn add_address(&self, kind: ProbeKind, addr: &str) -> Result<(), StorageError>;

    /// Forget an evicted address.
    async fn remove_address(&self, kind: ProbeKind, addr: &str) -> Result<(), StorageError>;

    /// All known addresses for a probe kind.
    async fn load_addresses(&self, kind: ProbeKind) -> Result<Vec<String>, StorageError>;

    /// Bump the monotonic total-request counter, returning the new value.
    async fn incr_requests(&self) -> Result<u64, StorageError>;

    /// Current total-request counter.
    async fn request_count(&self) -> Result<u64, StorageError>;
}
