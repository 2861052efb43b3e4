use super::models::AppState;
use crate::models::StatsResponse;
use axum::extract::State;
use axum::response::Json;
use mcpulse_events::AppEvent;
use mcpulse_utils::unix_now_nanos;
use std::sync::atomic::Ordering;

/// `GET /stats`: total requests served plus the current time in unix
/// nanoseconds.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = match &state.storage {
        Some(storage) => match storage.request_count().await {
            Ok(count) => count,
            Err(err) => {
                state.events.emit(AppEvent::Error {
                    context: "reading request counter".to_string(),
                    error: err.to_string(),
                });
                state.requests.load(Ordering::Relaxed)
            }
        },
        None => state.requests.load(Ordering::Relaxed),
    };

    Json(StatsResponse {
        stats,
        time: unix_now_nanos(),
    })
}

/// `GET /hi`
pub async fn hi() -> &'static str {
    "Hello :3"
}
