use dashmap::DashMap;
use mcpulse_config::Config;
use mcpulse_events::EventBus;
use mcpulse_probe::{PingProbe, Probe, QueryProbe};
use mcpulse_storage::PersistenceBackend;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// What a caller does when it needs a record while a probe for the same key
/// may already be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPolicy {
    /// Always run (or join) a probe and wait for its outcome. The refresh
    /// scheduler uses this so sweep cadence is preserved.
    WaitForLeader,
    /// Serve the cached record when one exists; probe only on a true miss.
    /// The read path uses this to keep latency low.
    CachedFirst,
}

/// Concurrent snapshot store for one probe kind, keyed by normalized
/// address. The union of keys across both instances is the refresh set.
pub struct SnapshotCache<R> {
    pub(crate) entries: DashMap<String, R>,
}

/// Short-TTL negative cache: presence of an address means the most recent
/// probe attempt failed and re-probing is suppressed until the TTL expires.
/// Shared by both probe kinds.
pub struct OfflineMarkers {
    pub(crate) markers: moka::future::Cache<String, ()>,
}

/// Collapses concurrent probes for the same address into one in-flight
/// operation whose outcome every waiter observes.
pub struct SingleFlight<R> {
    pub(crate) inflight: DashMap<String, broadcast::Sender<R>>,
}

/// Cache-relevant tuning, captured from the configuration at startup.
#[derive(Debug, Clone, Copy)]
pub struct CacheTuning {
    /// Negative-cache TTL after a failed probe.
    pub offline_ttl: Duration,
    /// Entries whose last success is older than this are evicted on the
    /// next failed probe.
    pub very_old_threshold_secs: i64,
    /// Read-path freshness window; 0 serves any cache hit.
    pub max_staleness_secs: i64,
    /// Hard wall clock around one scheduler probe job.
    pub job_deadline: Duration,
}

impl CacheTuning {
    pub fn from_config(config: &Config) -> Self {
        Self {
            offline_ttl: Duration::from_secs(config.cache.offline_ttl_secs),
            very_old_threshold_secs: config.cache.very_old_threshold_secs,
            max_staleness_secs: config.cache.max_staleness_secs,
            job_deadline: Duration::from_secs(config.probe.job_deadline_secs),
        }
    }
}

/// One probe kind's snapshot cache plus its coordination state. Outcome
/// application, single-flight and eviction all live here so both kinds run
/// the same code path.
pub struct ProbeStore<P: Probe> {
    pub(crate) probe: Arc<P>,
    pub(crate) snapshots: SnapshotCache<P::Record>,
    pub(crate) offline: Arc<OfflineMarkers>,
    pub(crate) flights: SingleFlight<P::Record>,
    pub(crate) tuning: CacheTuning,
    pub(crate) events: Arc<EventBus>,
    pub(crate) storage: Option<Arc<dyn PersistenceBackend>>,
}

/// Drives the periodic sweeps over both snapshot caches.
pub struct RefreshOrchestrator {
    pub(crate) ping: Arc<ProbeStore<PingProbe>>,
    pub(crate) query: Arc<ProbeStore<QueryProbe>>,
    pub(crate) interval: Duration,
    pub(crate) concurrency: usize,
    pub(crate) events: Arc<EventBus>,
}

/// Owns the two probe stores, the refresh orchestrator and the background
/// task lifecycle.
pub struct CacheManager {
    pub(crate) ping: Arc<ProbeStore<PingProbe>>,
    pub(crate) query: Arc<ProbeStore<QueryProbe>>,
    pub(crate) orchestrator: Arc<RefreshOrchestrator>,
    pub(crate) refresh_enabled: bool,
    pub(crate) events: Arc<EventBus>,
    pub(crate) storage: Option<Arc<dyn PersistenceBackend>>,
    pub(crate) shutdown_tx: broadcast::Sender<()>,
    pub(crate) tasks: Arc<DashMap<usize, JoinHandle<()>>>,
    pub(crate) task_counter: Arc<AtomicUsize>,
}
