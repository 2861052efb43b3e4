use super::client::client_id;
use super::models::AppState;
use crate::errors::ApiError;
use axum::http::HeaderMap;
use mcpulse_cache::{FlightPolicy, ProbeStore};
use mcpulse_events::AppEvent;
use mcpulse_models::{RecordStatus, ServerRecord};
use mcpulse_probe::Probe;
use std::net::SocketAddr;
use std::sync::Arc;

/// The read adapter shared by both endpoints: serve the cache when it can
/// answer, gate first touches behind the rate limiter, then probe through
/// single-flight. Only probes that fail outright count as offenses; an
/// "offline but probed" answer never does.
pub(super) async fn fetch_record<P: Probe>(
    state: &AppState,
    store: &Arc<ProbeStore<P>>,
    addr: &str,
    headers: &HeaderMap,
    peer: SocketAddr,
) -> Result<P::Record, ApiError> {
    if let Some(record) = store.cached(addr) {
        return Ok(record);
    }

    let client = client_id(headers, peer);
    if let Some(count) = state.rate_limiter.should_limit(&client) {
        state.events.emit(AppEvent::RateLimited {
            client,
            count,
        });
        return Err(ApiError::RateLimited {
            count,
            threshold: state.rate_limiter.threshold(),
        });
    }

    let record = store.fetch(addr, FlightPolicy::CachedFirst, None).await;
    if record.status() == RecordStatus::Error {
        state.rate_limiter.record_offense(&client);
    }

    Ok(record)
}
