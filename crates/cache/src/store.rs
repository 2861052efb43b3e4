use super::models::{
    CacheTuning, FlightPolicy, OfflineMarkers, ProbeStore, SingleFlight, SnapshotCache,
};
use super::single_flight::Flight;
use mcpulse_events::{AppEvent, EventBus};
use mcpulse_models::{ProbeKind, ServerRecord};
use mcpulse_probe::{classify, Probe};
use mcpulse_storage::PersistenceBackend;
use mcpulse_utils::{parse_unix, unix_now};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

impl<P: Probe> ProbeStore<P> {
    pub(crate) fn new(
        probe: Arc<P>,
        offline: Arc<OfflineMarkers>,
        tuning: CacheTuning,
        events: Arc<EventBus>,
        storage: Option<Arc<dyn PersistenceBackend>>,
    ) -> Self {
        Self {
            probe,
            snapshots: SnapshotCache::new(),
            offline,
            flights: SingleFlight::new(),
            tuning,
            events,
            storage,
        }
    }

    pub fn kind(&self) -> ProbeKind {
        self.probe.kind()
    }

    pub fn snapshots(&self) -> &SnapshotCache<P::Record> {
        &self.snapshots
    }

    /// Cached record for the read path, honoring the optional freshness
    /// window.
    pub fn cached(&self, addr: &str) -> Option<P::Record> {
        let record = self.snapshots.get(addr)?;
        if self.tuning.max_staleness_secs > 0 {
            let updated = parse_unix(record.last_updated())?;
            if unix_now() - updated > self.tuning.max_staleness_secs {
                return None;
            }
        }
        Some(record)
    }

    /// Fetches the record for an address, probing when needed. At most one
    /// probe per address is ever in flight; the policy decides what callers
    /// that arrive in the meantime observe. `deadline` is the scheduler's
    /// job bound; the read path passes `None` and relies on the probe's own
    /// timeouts.
    pub async fn fetch(
        &self,
        addr: &str,
        policy: FlightPolicy,
        deadline: Option<Duration>,
    ) -> P::Record {
        if policy == FlightPolicy::CachedFirst {
            if let Some(record) = self.cached(addr) {
                return record;
            }
        }

        match self.flights.join_or_lead(addr) {
            Flight::Leader(guard) => {
                let record = self.probe_and_apply(addr, deadline).await;
                guard.publish(record.clone());
                record
            }
            Flight::Follower(mut rx) => match rx.recv().await {
                Ok(record) => record,
                // The leader was cancelled before publishing; serve whatever
                // the cache still holds.
                Err(_) => self
                    .snapshots
                    .get(addr)
                    .unwrap_or_else(P::Record::offline_placeholder),
            },
        }
    }

    async fn probe_and_apply(&self, addr: &str, deadline: Option<Duration>) -> P::Record {
        if self.offline.is_offline(addr).await {
            return P::Record::offline_placeholder();
        }

        let started = Instant::now();
        let result = match deadline {
            Some(deadline) => match timeout(deadline, self.probe.probe(addr)).await {
                Ok(result) => result,
                Err(_) => {
                    self.events.emit(AppEvent::ProbeTimeout {
                        kind: self.probe.kind(),
                        addr: addr.to_string(),
                    });
                    // A deadline hit is not a verdict on the address: no
                    // eviction, no offline marker; the next sweep retries.
                    return self
                        .snapshots
                        .get(addr)
                        .unwrap_or_else(P::Record::offline_placeholder);
                }
            },
            None => self.probe.probe(addr).await,
        };

        let outcome = classify(result, self.probe.fatal_markers());
        self.apply_outcome(addr, outcome, started).await
    }

    pub(crate) async fn persist_add(&self, addr: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.add_address(self.probe.kind(), addr).await {
                self.events.emit(AppEvent::Error {
                    context: format!("persisting {} address {}", self.probe.kind(), addr),
                    error: err.to_string(),
                });
            }
        }
    }

    pub(crate) async fn persist_remove(&self, addr: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove_address(self.probe.kind(), addr).await {
                self.events.emit(AppEvent::Error {
                    context: format!("forgetting {} address {}", self.probe.kind(), addr),
                    error: err.to_string(),
                });
            }
        }
    }
}
