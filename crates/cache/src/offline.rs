use super::models::OfflineMarkers;
use std::time::Duration;

impl OfflineMarkers {
    pub fn new(ttl: Duration) -> Self {
        Self {
            markers: moka::future::Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Remembers that the most recent probe of this address failed.
    pub async fn mark(&self, addr: &str) {
        self.markers.insert(addr.to_string(), ()).await;
    }

    /// Whether probing this address is currently suppressed.
    pub async fn is_offline(&self, addr: &str) -> bool {
        self.markers.get(addr).await.is_some()
    }

    /// Drops the marker, re-enabling probes (a successful probe landed).
    pub async fn clear(&self, addr: &str) {
        self.markers.invalidate(addr).await;
    }
}
