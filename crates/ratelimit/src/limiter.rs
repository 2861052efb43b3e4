use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Per-client offense counter. Clients earn offenses for first-touch probes
/// that fail outright; cached answers are never rate limited. A periodic
/// decay sweep subtracts the threshold from every counter, so an idle
/// client is forgiven within `count / threshold` seconds.
pub struct RateLimiter {
    counts: DashMap<String, u32>,
    threshold: u32,
}

impl RateLimiter {
    pub fn new(threshold: u32) -> Arc<Self> {
        Arc::new(Self {
            counts: DashMap::new(),
            threshold,
        })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Read-only check: `Some(count)` when the client is over the
    /// threshold. Offenses are recorded separately, never in here.
    pub fn should_limit(&self, client: &str) -> Option<u32> {
        let count = self.counts.get(client).map(|entry| *entry.value())?;
        (count > self.threshold).then_some(count)
    }

    /// Records one offense for a client.
    pub fn record_offense(&self, client: &str) {
        *self.counts.entry(client.to_string()).or_insert(0) += 1;
    }

    /// One decay step: every counter drops by the threshold, exhausted ones
    /// are removed.
    pub fn decay(&self) {
        self.counts.retain(|_, count| {
            *count = count.saturating_sub(self.threshold);
            *count > 0
        });
    }

    /// Spawns the periodic decay sweep; it stops when the shutdown channel
    /// fires.
    pub fn spawn_decay_loop(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => limiter.decay(),
                    _ = shutdown_rx.recv() => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_clients_are_not_limited() {
        let limiter = RateLimiter::new(5);
        assert_eq!(limiter.should_limit("1.2.3.4"), None);
    }

    #[test]
    fn limiting_starts_past_the_threshold() {
        let limiter = RateLimiter::new(5);

        for _ in 0..5 {
            limiter.record_offense("1.2.3.4");
        }
        assert_eq!(limiter.should_limit("1.2.3.4"), None);

        limiter.record_offense("1.2.3.4");
        assert_eq!(limiter.should_limit("1.2.3.4"), Some(6));

        // reading the counter never bumps it
        assert_eq!(limiter.should_limit("1.2.3.4"), Some(6));
    }

    #[test]
    fn clients_are_tracked_independently() {
        let limiter = RateLimiter::new(2);
        for _ in 0..3 {
            limiter.record_offense("1.2.3.4");
        }
        assert_eq!(limiter.should_limit("1.2.3.4"), Some(3));
        assert_eq!(limiter.should_limit("5.6.7.8"), None);
    }

    #[test]
    fn decay_forgives_idle_clients() {
        let limiter = RateLimiter::new(5);
        for _ in 0..12 {
            limiter.record_offense("1.2.3.4");
        }
        assert_eq!(limiter.should_limit("1.2.3.4"), Some(12));

        limiter.decay();
        assert_eq!(limiter.should_limit("1.2.3.4"), Some(7));

        limiter.decay();
        assert_eq!(limiter.should_limit("1.2.3.4"), None);

        limiter.decay();
        assert!(limiter.counts.is_empty());
    }

    #[tokio::test]
    async fn decay_loop_stops_on_shutdown() {
        let limiter = RateLimiter::new(5);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = limiter.spawn_decay_loop(Duration::from_millis(10), shutdown_rx);
        let _ = shutdown_tx.send(());
        handle.await.unwrap();
    }
}
