use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use mcpulse_models::{PingRecord, ProbeKind, QueryRecord, ServerRecord};
use thiserror::Error;

use crate::models::RateLimitResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The caller omitted the `ip` parameter. Never cached; the body keeps
    /// the record shape of the endpoint that rejected it.
    #[error("missing data")]
    MissingData { kind: ProbeKind },

    /// The client burned through its failing-probe allowance.
    #[error("too many invalid requests")]
    RateLimited { count: u32, threshold: u32 },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingData {
                kind: ProbeKind::Ping,
            } => (
                StatusCode::BAD_REQUEST,
                Json(PingRecord::fatal("missing data")),
            )
                .into_response(),
            ApiError::MissingData {
                kind: ProbeKind::Query,
            } => (
                StatusCode::BAD_REQUEST,
                Json(QueryRecord::fatal("missing data")),
            )
                .into_response(),
            ApiError::RateLimited { count, threshold } => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitResponse {
                    error: "too many invalid requests".to_string(),
                    try_after: count / threshold,
                }),
            )
                .into_response(),
        }
    }
}
