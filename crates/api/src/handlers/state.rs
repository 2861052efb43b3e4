use super::models::AppState;
use axum::extract::FromRef;
use mcpulse_cache::CacheManager;
use mcpulse_events::EventBus;
use mcpulse_ratelimit::RateLimiter;
use mcpulse_storage::PersistenceBackend;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

impl AppState {
    pub fn new(
        cache: Arc<CacheManager>,
        rate_limiter: Arc<RateLimiter>,
        events: Arc<EventBus>,
        storage: Option<Arc<dyn PersistenceBackend>>,
    ) -> Self {
        Self {
            cache,
            rate_limiter,
            events,
            storage,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl FromRef<AppState> for Arc<CacheManager> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.cache)
    }
}
