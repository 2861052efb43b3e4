use super::models::SnapshotCache;
use dashmap::DashMap;

impl<R: Clone> SnapshotCache<R> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Most recent record for an address, if one has been observed and not
    /// evicted.
    pub fn get(&self, addr: &str) -> Option<R> {
        self.entries.get(addr).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, addr: &str) -> bool {
        self.entries.contains_key(addr)
    }

    pub fn insert(&self, addr: &str, record: R) {
        self.entries.insert(addr.to_string(), record);
    }

    pub fn remove(&self, addr: &str) -> Option<R> {
        self.entries.remove(addr).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visits every entry while holding that entry's shard lock: the
    /// callback observes a consistent view of the entry and no writer can
    /// mutate that same key during the visit. Writes to other keys proceed.
    pub fn for_each_locked<F: FnMut(&str, &R)>(&self, mut visitor: F) {
        for entry in self.entries.iter() {
            visitor(entry.key(), entry.value());
        }
    }

    /// Visits a point-in-time copy of every entry without holding any lock
    /// during the callback body.
    pub fn for_each<F: FnMut(&str, R)>(&self, mut visitor: F) {
        for addr in self.keys() {
            if let Some(record) = self.get(&addr) {
                visitor(&addr, record);
            }
        }
    }

    /// Point-in-time snapshot of the key set; the refresh scheduler sweeps
    /// over this.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.entries.len());
        self.for_each_locked(|addr, _| keys.push(addr.to_string()));
        keys
    }
}

impl<R: Clone> Default for SnapshotCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_reflects_insert_and_remove() {
        let cache: SnapshotCache<u32> = SnapshotCache::new();
        assert_eq!(cache.get("a:25565"), None);

        cache.insert("a:25565", 1);
        assert_eq!(cache.get("a:25565"), Some(1));
        assert!(cache.contains("a:25565"));

        cache.insert("a:25565", 2);
        assert_eq!(cache.get("a:25565"), Some(2));

        assert_eq!(cache.remove("a:25565"), Some(2));
        assert_eq!(cache.get("a:25565"), None);
        assert_eq!(cache.remove("a:25565"), None);
    }

    #[test]
    fn keys_snapshot_the_whole_set() {
        let cache: SnapshotCache<u32> = SnapshotCache::new();
        cache.insert("a:25565", 1);
        cache.insert("b:25565", 2);

        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["a:25565".to_string(), "b:25565".to_string()]);
    }

    #[test]
    fn locked_iteration_sees_every_entry_once() {
        let cache: SnapshotCache<u32> = SnapshotCache::new();
        for i in 0..16 {
            cache.insert(&format!("host{}:25565", i), i);
        }

        let mut seen = 0;
        let mut sum = 0;
        cache.for_each_locked(|_, value| {
            seen += 1;
            sum += value;
        });
        assert_eq!(seen, 16);
        assert_eq!(sum, (0..16).sum::<u32>());
    }
}
