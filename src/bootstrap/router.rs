use axum::http::{header, HeaderValue};
use axum::{middleware, routing::get, Router};
use mcpulse_api::{hi, server_query, server_status, stats, track_requests, AppState};
use mcpulse_config::Config;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
};

pub fn build(config: &Config, app_state: AppState) -> Router {
    let timeout = Duration::from_secs(config.server.timeout_secs);
    let max_concurrent_requests = config.server.max_concurrent_requests;

    let mut router = Router::new()
        .route("/hi", get(hi))
        .route("/stats", get(stats))
        .route("/server/status", get(server_status))
        .route("/server/query", get(server_query))
        // legacy prefix kept for clients pinned to the old URL scheme
        .route("/minecraft/1.3/server/status", get(server_status))
        .route("/minecraft/1.3/server/query", get(server_query))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_requests,
        ))
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(TimeoutLayer::new(timeout))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("max-age=300, public, s-maxage=300"),
        ));

    // Optionally enable compression based on config
    if config.server.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    router
        .layer(build_cors_layer(&config.server.allowed_origins))
        .with_state(app_state)
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
