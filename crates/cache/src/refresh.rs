use super::models::{FlightPolicy, ProbeStore, RefreshOrchestrator};
use mcpulse_events::{AppEvent, EventBus};
use mcpulse_probe::{PingProbe, Probe, QueryProbe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::interval;

impl RefreshOrchestrator {
    pub(crate) fn new(
        ping: Arc<ProbeStore<PingProbe>>,
        query: Arc<ProbeStore<QueryProbe>>,
        interval: Duration,
        concurrency: usize,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            ping,
            query,
            interval,
            concurrency,
            events,
        }
    }

    /// Runs forever. The first tick completes immediately, so startup gets
    /// a sweep without waiting out a full interval.
    pub async fn run_refresh_loop(&self) {
        let mut ticker = interval(self.interval);
        loop {
            ticker.tick().await;
            self.sweep_all().await;
        }
    }

    /// One sweep over every known address of both probe kinds. A sweep
    /// awaits all of its jobs, so sweeps of the same kind never overlap.
    pub async fn sweep_all(&self) {
        self.sweep(&self.ping).await;
        self.sweep(&self.query).await;
    }

    async fn sweep<P: Probe>(&self, store: &Arc<ProbeStore<P>>) {
        let addresses = store.snapshots().keys();
        if addresses.is_empty() {
            return;
        }

        self.events.emit(AppEvent::SweepStarted {
            kind: store.kind(),
            addresses: addresses.len(),
        });

        let started = Instant::now();
        sweep_addresses(store, addresses, self.concurrency).await;

        self.events.emit(AppEvent::SweepCompleted {
            kind: store.kind(),
            duration: started.elapsed(),
        });
    }
}

/// Pushes every address through the probe behind a bounded semaphore and
/// waits for all jobs. Each job carries the scheduler's hard deadline; the
/// per-address single-flight keeps a sweep from racing a foreground probe.
pub(crate) async fn sweep_addresses<P: Probe>(
    store: &Arc<ProbeStore<P>>,
    addresses: Vec<String>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let deadline = store.tuning.job_deadline;

    let jobs: Vec<_> = addresses
        .into_iter()
        .map(|addr| {
            let store = Arc::clone(store);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                store
                    .fetch(&addr, FlightPolicy::WaitForLeader, Some(deadline))
                    .await;
            })
        })
        .collect();

    futures::future::join_all(jobs).await;
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{store_with_probe, MockProbe};
    use super::*;
    use mcpulse_models::{PingRecord, ServerRecord};

    #[tokio::test]
    async fn a_sweep_probes_every_known_address() {
        let probe = Arc::new(MockProbe::new());
        let store = Arc::new(store_with_probe(Arc::clone(&probe)));

        let mut seeded = PingRecord::default();
        seeded.mark_online("100");
        store.snapshots().insert("a.example:25565", seeded.clone());
        store.snapshots().insert("b.example:25565", seeded.clone());
        store.snapshots().insert("c.example:25565", seeded);

        sweep_addresses(&store, store.snapshots().keys(), 2).await;

        assert_eq!(probe.calls(), 3);
        for addr in ["a.example:25565", "b.example:25565", "c.example:25565"] {
            let record = store.snapshots().get(addr).unwrap();
            assert!(record.online);
            assert_ne!(record.last_online, "100");
        }
    }

    #[tokio::test]
    async fn sweeps_tolerate_more_addresses_than_permits() {
        let probe = Arc::new(MockProbe::with_delay(Duration::from_millis(5)));
        let store = Arc::new(store_with_probe(Arc::clone(&probe)));

        let mut seeded = PingRecord::default();
        seeded.mark_online("100");
        for i in 0..10 {
            store
                .snapshots()
                .insert(&format!("host{}.example:25565", i), seeded.clone());
        }

        sweep_addresses(&store, store.snapshots().keys(), 1).await;
        assert_eq!(probe.calls(), 10);
    }
}
