use mcpulse_cache::CacheManager;
use mcpulse_events::EventBus;
use mcpulse_ratelimit::RateLimiter;
use mcpulse_storage::PersistenceBackend;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub(super) cache: Arc<CacheManager>,
    pub(super) rate_limiter: Arc<RateLimiter>,
    pub(super) events: Arc<EventBus>,
    pub(super) storage: Option<Arc<dyn PersistenceBackend>>,
    /// In-process request counter, the fallback when storage is absent.
    pub(super) requests: Arc<AtomicU64>,
}
