use super::models::ProbeStore;
use mcpulse_events::{AppEvent, EvictionReason};
use mcpulse_models::ServerRecord;
use mcpulse_probe::{Probe, ProbeOutcome};
use mcpulse_utils::{parse_unix, unix_now, unix_now_string};
use std::time::Instant;

/// Public error string for addresses that fail fatally.
const FATAL_ADDRESS_ERROR: &str = "invalid hostname or port";

impl<P: Probe> ProbeStore<P> {
    /// Applies a terminal probe outcome to the snapshot cache and returns
    /// the record callers observe.
    pub(crate) async fn apply_outcome(
        &self,
        addr: &str,
        outcome: ProbeOutcome<P::Record>,
        started: Instant,
    ) -> P::Record {
        match outcome {
            ProbeOutcome::Success(mut record) => {
                let now = unix_now_string();
                record.mark_online(&now);
                record.set_duration(started.elapsed().as_nanos() as i64);

                let is_new = !self.snapshots.contains(addr);
                self.snapshots.insert(addr, record.clone());
                self.offline.clear(addr).await;

                if is_new {
                    self.events.emit(AppEvent::CacheNew {
                        kind: self.probe.kind(),
                        addr: addr.to_string(),
                    });
                    self.persist_add(addr).await;
                }

                record
            }
            ProbeOutcome::Transient(err) => {
                tracing::debug!("{} probe for {} failed: {}", self.probe.kind(), addr, err);

                let now = unix_now_string();
                let mut record = self.snapshots.get(addr).unwrap_or_default();
                record.mark_unreachable(&now);
                record.set_duration(started.elapsed().as_nanos() as i64);

                self.offline.mark(addr).await;

                // An entry that has not been seen online within the very-old
                // threshold leaves the cache and with it the refresh set. A
                // first failure with no success on record goes the same way.
                let very_old = match parse_unix(record.last_online()) {
                    Some(last_online) => {
                        unix_now() - last_online > self.tuning.very_old_threshold_secs
                    }
                    None => true,
                };

                if very_old {
                    if self.snapshots.remove(addr).is_some() {
                        self.events.emit(AppEvent::CacheEvicted {
                            kind: self.probe.kind(),
                            addr: addr.to_string(),
                            reason: EvictionReason::VeryOld,
                        });
                        self.persist_remove(addr).await;
                    }
                } else {
                    self.snapshots.insert(addr, record.clone());
                }

                record
            }
            ProbeOutcome::Fatal(err) => {
                tracing::debug!(
                    "{} probe for {} failed fatally: {}",
                    self.probe.kind(),
                    addr,
                    err
                );

                if self.snapshots.remove(addr).is_some() {
                    self.persist_remove(addr).await;
                }
                self.offline.mark(addr).await;
                self.events.emit(AppEvent::CacheEvicted {
                    kind: self.probe.kind(),
                    addr: addr.to_string(),
                    reason: EvictionReason::Fatal,
                });

                P::Record::fatal(FATAL_ADDRESS_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{store_with_probe, MockProbe};
    use super::*;
    use mcpulse_models::{PingRecord, RecordStatus};
    use mcpulse_probe::ProbeError;
    use std::sync::Arc;

    fn transient() -> ProbeOutcome<PingRecord> {
        ProbeOutcome::Transient(ProbeError::Timeout)
    }

    fn fatal() -> ProbeOutcome<PingRecord> {
        ProbeOutcome::Fatal(ProbeError::Resolve("nosuch.example:1".to_string()))
    }

    #[tokio::test]
    async fn success_stamps_both_timestamps_together() {
        let store = store_with_probe(Arc::new(MockProbe::new()));

        let record = store
            .apply_outcome(
                "mc.example:25565",
                ProbeOutcome::Success(PingRecord::default()),
                Instant::now(),
            )
            .await;

        assert!(record.online);
        assert_eq!(record.status, RecordStatus::Success);
        assert_eq!(record.last_online, record.last_updated);
        assert!(!record.last_online.is_empty());
        assert!(store.snapshots().contains("mc.example:25565"));
    }

    #[tokio::test]
    async fn success_clears_a_standing_offline_marker() {
        let store = store_with_probe(Arc::new(MockProbe::new()));
        store.offline.mark("mc.example:25565").await;

        store
            .apply_outcome(
                "mc.example:25565",
                ProbeOutcome::Success(PingRecord::default()),
                Instant::now(),
            )
            .await;

        assert!(!store.offline.is_offline("mc.example:25565").await);
    }

    #[tokio::test]
    async fn transient_preserves_last_online_exactly() {
        let store = store_with_probe(Arc::new(MockProbe::new()));

        let now = mcpulse_utils::unix_now_string();
        let mut prior = PingRecord {
            motd: "was here".to_string(),
            ..PingRecord::default()
        };
        prior.mark_online(&now);
        store.snapshots().insert("mc.example:25565", prior);

        let record = store
            .apply_outcome("mc.example:25565", transient(), Instant::now())
            .await;

        assert_eq!(record.last_online, now);
        assert!(!record.online);
        assert_eq!(record.status, RecordStatus::Success);
        assert_eq!(record.error, "");
        assert_eq!(record.motd, "was here");
        assert!(store.snapshots().contains("mc.example:25565"));
        assert!(store.offline.is_offline("mc.example:25565").await);
    }

    #[tokio::test]
    async fn transient_evicts_very_old_entries() {
        let store = store_with_probe(Arc::new(MockProbe::new()));

        let mut ancient = PingRecord::default();
        ancient.mark_online(&(unix_now() - 25 * 60 * 60).to_string());
        store.snapshots().insert("old.example:25565", ancient);

        store
            .apply_outcome("old.example:25565", transient(), Instant::now())
            .await;

        assert!(!store.snapshots().contains("old.example:25565"));
    }

    #[tokio::test]
    async fn first_touch_transient_never_enters_the_cache() {
        let store = store_with_probe(Arc::new(MockProbe::new()));

        let record = store
            .apply_outcome("new.example:25565", transient(), Instant::now())
            .await;

        assert_eq!(record.last_online, "");
        assert!(!record.last_updated.is_empty());
        assert!(!store.snapshots().contains("new.example:25565"));
        assert!(store.offline.is_offline("new.example:25565").await);
    }

    #[tokio::test]
    async fn fatal_evicts_and_marks_offline() {
        let store = store_with_probe(Arc::new(MockProbe::new()));

        let mut prior = PingRecord::default();
        prior.mark_online(&mcpulse_utils::unix_now_string());
        store.snapshots().insert("bad.example:1", prior);

        let record = store
            .apply_outcome("bad.example:1", fatal(), Instant::now())
            .await;

        assert_eq!(record.status, RecordStatus::Error);
        assert!(!record.online);
        assert_eq!(record.error, "invalid hostname or port");
        assert!(!store.snapshots().contains("bad.example:1"));
        assert!(store.offline.is_offline("bad.example:1").await);
    }
}
