use super::models::SingleFlight;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;

/// Role a caller gets when it asks to probe a key.
pub(crate) enum Flight<'a, R: Clone> {
    Leader(LeaderGuard<'a, R>),
    Follower(broadcast::Receiver<R>),
}

/// Held by the leader until it publishes. Dropping without publishing (a
/// cancelled job) clears the in-flight slot so the key cannot wedge.
pub(crate) struct LeaderGuard<'a, R: Clone> {
    flights: &'a SingleFlight<R>,
    key: String,
    tx: Option<broadcast::Sender<R>>,
}

impl<R: Clone> SingleFlight<R> {
    pub fn new() -> Self {
        Self {
            inflight: DashMap::new(),
        }
    }

    /// The first caller for a key becomes the leader and must `publish`
    /// exactly one outcome; everyone else gets a receiver for it.
    pub(crate) fn join_or_lead(&self, key: &str) -> Flight<'_, R> {
        match self.inflight.entry(key.to_string()) {
            Entry::Occupied(entry) => Flight::Follower(entry.get().subscribe()),
            Entry::Vacant(slot) => {
                let (tx, _) = broadcast::channel(1);
                slot.insert(tx.clone());
                Flight::Leader(LeaderGuard {
                    flights: self,
                    key: key.to_string(),
                    tx: Some(tx),
                })
            }
        }
    }

    /// Number of probes currently in flight across all keys.
    pub fn inflight_count(&self) -> usize {
        self.inflight.len()
    }
}

impl<R: Clone> Default for SingleFlight<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> LeaderGuard<'_, R> {
    /// Publishes the outcome to every follower and frees the slot.
    pub(crate) fn publish(mut self, result: R) {
        self.flights.inflight.remove(&self.key);
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(result);
        }
    }
}

impl<R: Clone> Drop for LeaderGuard<'_, R> {
    fn drop(&mut self) {
        if self.tx.take().is_some() {
            self.flights.inflight.remove(&self.key);
        }
    }
}
