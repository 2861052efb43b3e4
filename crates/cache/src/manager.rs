use super::errors::CacheError;
use super::models::{CacheManager, CacheTuning, OfflineMarkers, ProbeStore, RefreshOrchestrator};
use super::refresh::sweep_addresses;
use dashmap::DashMap;
use mcpulse_config::Config;
use mcpulse_events::{AppEvent, EventBus};
use mcpulse_models::ProbeKind;
use mcpulse_probe::{PingProbe, QueryProbe};
use mcpulse_storage::PersistenceBackend;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

type Result<T> = std::result::Result<T, CacheError>;

impl CacheManager {
    pub fn new(
        config: &Config,
        events: Arc<EventBus>,
        storage: Option<Arc<dyn PersistenceBackend>>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let tuning = CacheTuning::from_config(config);
        let probe_timeout = Duration::from_secs(config.probe.tcp_timeout_secs);

        // One marker map serves both kinds: offline is a property of the
        // address, not of the protocol that noticed it.
        let offline = Arc::new(OfflineMarkers::new(tuning.offline_ttl));

        let ping = Arc::new(ProbeStore::new(
            Arc::new(PingProbe::new(probe_timeout)),
            Arc::clone(&offline),
            tuning,
            Arc::clone(&events),
            storage.clone(),
        ));
        let query = Arc::new(ProbeStore::new(
            Arc::new(QueryProbe::new(probe_timeout)),
            Arc::clone(&offline),
            tuning,
            Arc::clone(&events),
            storage.clone(),
        ));

        let orchestrator = Arc::new(RefreshOrchestrator::new(
            Arc::clone(&ping),
            Arc::clone(&query),
            Duration::from_secs(config.refresh.interval_secs),
            config.refresh.concurrency,
            Arc::clone(&events),
        ));

        Self {
            ping,
            query,
            orchestrator,
            refresh_enabled: config.refresh.enabled,
            events,
            storage,
            shutdown_tx,
            tasks: Arc::new(DashMap::new()),
            task_counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn ping(&self) -> &Arc<ProbeStore<PingProbe>> {
        &self.ping
    }

    pub fn query(&self) -> &Arc<ProbeStore<QueryProbe>> {
        &self.query
    }

    /// Repopulates the refresh set from the persistence collaborator by
    /// probing every known address once. A no-op without storage.
    pub async fn initialize(&self) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let ping_addrs = storage.load_addresses(ProbeKind::Ping).await?;
        let query_addrs = storage.load_addresses(ProbeKind::Query).await?;

        self.events.emit(AppEvent::StorageLoaded {
            ping: ping_addrs.len(),
            query: query_addrs.len(),
        });

        let concurrency = self.orchestrator.concurrency;
        sweep_addresses(&self.ping, ping_addrs, concurrency).await;
        sweep_addresses(&self.query, query_addrs, concurrency).await;

        Ok(())
    }

    /// Starts the background refresh loop unless disabled by configuration.
    /// First-touch probing works either way.
    pub async fn start_auto_refresh(&self) {
        if !self.refresh_enabled {
            self.events.emit(AppEvent::RefreshDisabled);
            return;
        }

        self.events.emit(AppEvent::RefreshEnabled {
            interval: self.orchestrator.interval.as_secs(),
        });

        let orchestrator = Arc::clone(&self.orchestrator);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = orchestrator.run_refresh_loop() => {
                    tracing::info!("Refresh loop ended");
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Refresh loop shutting down gracefully");
                }
            }
        });

        let task_id = self.task_counter.fetch_add(1, Ordering::SeqCst);
        self.tasks.insert(task_id, handle);
    }

    /// Lets collaborators (the rate-limiter decay loop) stop with the rest
    /// of the background tasks.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signals graceful shutdown to all background tasks and waits for them.
    pub async fn shutdown(&self) {
        tracing::info!("CacheManager: Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(());

        let task_ids: Vec<usize> = self.tasks.iter().map(|entry| *entry.key()).collect();
        for task_id in task_ids {
            if let Some((_, handle)) = self.tasks.remove(&task_id) {
                let _ = handle.await;
            }
        }

        tracing::info!("CacheManager: All tasks shut down gracefully");
    }
}
