mod bootstrap;

use crate::bootstrap::{config, logging, router};
use anyhow::Result;
use mcpulse_api::AppState;
use mcpulse_cache::CacheManager;
use mcpulse_events::{AppEvent, EventBus};
use mcpulse_ratelimit::RateLimiter;
use mcpulse_storage::{LocalStore, PersistenceBackend};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let events = EventBus::new(true);
    events.emit(AppEvent::Starting);

    let config_path = std::env::var("MCPULSE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = config::load(&config_path, &events).await?;

    let storage: Option<Arc<dyn PersistenceBackend>> = if config.storage.enabled {
        Some(Arc::new(LocalStore::open(&config.storage.path).await?))
    } else {
        events.emit(AppEvent::StorageDisabled);
        None
    };

    let cache_manager = Arc::new(CacheManager::new(&config, Arc::clone(&events), storage.clone()));
    cache_manager.initialize().await?;
    cache_manager.start_auto_refresh().await;

    let rate_limiter = RateLimiter::new(config.rate_limit.threshold);
    let decay_handle = rate_limiter.spawn_decay_loop(
        Duration::from_secs(config.rate_limit.decay_interval_secs),
        cache_manager.subscribe_shutdown(),
    );

    let app_state = AppState::new(
        Arc::clone(&cache_manager),
        rate_limiter,
        Arc::clone(&events),
        storage,
    );
    let app = router::build(&config, app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = bind_server(&addr).await?;

    events.emit(AppEvent::Ready { addr: addr.clone() });

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        tracing::info!("Shutdown signal received, initiating graceful shutdown...");
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .tcp_nodelay(config.server.tcp_nodelay)
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    cache_manager.shutdown().await;
    let _ = decay_handle.await;
    events.emit(AppEvent::Shutdown);
    Ok(())
}

async fn bind_server(addr: &str) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            let port = addr.split(':').last().unwrap_or("unknown");
            tracing::error!("❌ Port {} is already in use", port);
            tracing::error!("   Another application is using this port");
            tracing::error!("   Stop it or change the port in config.toml");
        } else {
            tracing::error!("❌ Failed to bind server on {}: {}", addr, e);
        }
        anyhow::anyhow!("Failed to bind server: {}", e)
    })
}
