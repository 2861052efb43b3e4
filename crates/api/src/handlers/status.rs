use super::lookup::fetch_record;
use super::models::AppState;
use crate::errors::ApiError;
use crate::models::AddressParams;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use mcpulse_models::{PingRecord, ProbeKind};
use mcpulse_utils::normalize_address;
use std::net::SocketAddr;

/// `GET /server/status?ip=<host>&port=<int?>`
pub async fn server_status(
    State(state): State<AppState>,
    Query(params): Query<AddressParams>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<PingRecord>, ApiError> {
    let addr = normalize_address(&params.ip, &params.port).map_err(|_| ApiError::MissingData {
        kind: ProbeKind::Ping,
    })?;

    let record = fetch_record(&state, state.cache.ping(), &addr, &headers, peer).await?;
    Ok(Json(record))
}
