use super::models::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use mcpulse_events::AppEvent;
use std::sync::atomic::Ordering;

/// Counts every API request, mirroring the total to storage when present.
/// A failed mirror write is reported and otherwise ignored; the in-memory
/// counter stays authoritative for this process.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::Relaxed);

    if let Some(storage) = &state.storage {
        if let Err(err) = storage.incr_requests().await {
            state.events.emit(AppEvent::Error {
                context: "incrementing request counter".to_string(),
                error: err.to_string(),
            });
        }
    }

    next.run(request).await
}
