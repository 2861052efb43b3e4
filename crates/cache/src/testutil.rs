use super::models::{CacheTuning, OfflineMarkers, ProbeStore};
use mcpulse_events::EventBus;
use mcpulse_models::{PingRecord, ProbeKind};
use mcpulse_probe::{Probe, ProbeError, FATAL_NETWORK_MARKERS};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scriptable probe for exercising the cache engine without any network.
/// Without a script every call succeeds with a default record; pushed
/// errors become `ProbeError::Protocol`, whose message decides whether the
/// classifier sees them as transient or fatal.
pub(crate) struct MockProbe {
    calls: AtomicUsize,
    delay: Duration,
    script: Mutex<VecDeque<Result<PingRecord, String>>>,
}

impl MockProbe {
    pub(crate) fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            script: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push_ok(&self, record: PingRecord) {
        self.script.lock().unwrap().push_back(Ok(record));
    }

    pub(crate) fn push_err(&self, message: &str) {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Probe for MockProbe {
    type Record = PingRecord;

    fn kind(&self) -> ProbeKind {
        ProbeKind::Ping
    }

    fn fatal_markers(&self) -> &'static [&'static str] {
        FATAL_NETWORK_MARKERS
    }

    async fn probe(&self, _addr: &str) -> Result<PingRecord, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(record)) => Ok(record),
            Some(Err(message)) => Err(ProbeError::Protocol(message)),
            None => Ok(PingRecord {
                motd: "mock server".to_string(),
                ..PingRecord::default()
            }),
        }
    }
}

pub(crate) fn tuning() -> CacheTuning {
    CacheTuning {
        offline_ttl: Duration::from_secs(60),
        very_old_threshold_secs: 24 * 60 * 60,
        max_staleness_secs: 0,
        job_deadline: Duration::from_secs(5),
    }
}

pub(crate) fn store_with(probe: Arc<MockProbe>, tuning: CacheTuning) -> ProbeStore<MockProbe> {
    ProbeStore::new(
        probe,
        Arc::new(OfflineMarkers::new(tuning.offline_ttl)),
        tuning,
        EventBus::new(true),
        None,
    )
}

pub(crate) fn store_with_probe(probe: Arc<MockProbe>) -> ProbeStore<MockProbe> {
    store_with(probe, tuning())
}
