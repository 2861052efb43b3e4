use super::lookup::fetch_record;
use super::models::AppState;
use crate::errors::ApiError;
use crate::models::AddressParams;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use mcpulse_models::{ProbeKind, QueryRecord};
use mcpulse_utils::normalize_address;
use std::net::SocketAddr;

/// `GET /server/query?ip=<host>&port=<int?>`
pub async fn server_query(
    State(state): State<AppState>,
    Query(params): Query<AddressParams>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<QueryRecord>, ApiError> {
    let addr = normalize_address(&params.ip, &params.port).map_err(|_| ApiError::MissingData {
        kind: ProbeKind::Query,
    })?;

    let record = fetch_record(&state, state.cache.query(), &addr, &headers, peer).await?;
    Ok(Json(record))
}
