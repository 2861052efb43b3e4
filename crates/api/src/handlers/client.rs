use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Client identifier for rate limiting: the first hop of `X-Forwarded-For`
/// when a trusted reverse proxy provides one, otherwise the direct peer
/// address.
pub(super) fn client_id(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}
