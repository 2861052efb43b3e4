use crate::backend::PersistenceBackend;
use crate::StorageError;
use mcpulse_models::ProbeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// JSON-file persistence backend. The whole state is small (two address
/// sets and a counter), so every mutation rewrites the file under the lock.
pub struct LocalStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    ping: BTreeSet<String>,
    #[serde(default)]
    query: BTreeSet<String>,
    #[serde(default)]
    requests: u64,
}

impl LocalStore {
    /// Opens the store, reading prior state when the file exists.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = tokio::fs::read(&path).await?;
            serde_json::from_slice(&content)?
        } else {
            StoreState::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    async fn persist(&self, state: &StoreState) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

fn set_for(state: &mut StoreState, kind: ProbeKind) -> &mut BTreeSet<String> {
    match kind {
        ProbeKind::Ping => &mut state.ping,
        ProbeKind::Query => &mut state.query,
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for LocalStore {
    async fn add_address(&self, kind: ProbeKind, addr: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if set_for(&mut state, kind).insert(addr.to_string()) {
            self.persist(&state).await?;
        }
        Ok(())
    }

    async fn remove_address(&self, kind: ProbeKind, addr: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if set_for(&mut state, kind).remove(addr) {
            self.persist(&state).await?;
        }
        Ok(())
    }

    async fn load_addresses(&self, kind: ProbeKind) -> Result<Vec<String>, StorageError> {
        let state = self.state.lock().await;
        let set = match kind {
            ProbeKind::Ping => &state.ping,
            ProbeKind::Query => &state.query,
        };
        Ok(set.iter().cloned().collect())
    }

    async fn incr_requests(&self) -> Result<u64, StorageError> {
        let mut state = self.state.lock().await;
        state.requests += 1;
        let count = state.requests;
        self.persist(&state).await?;
        Ok(count)
    }

    async fn request_count(&self) -> Result<u64, StorageError> {
        let state = self.state.lock().await;
        Ok(state.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(name: &str) -> (LocalStore, PathBuf) {
        let path = std::env::temp_dir().join(format!("mcpulse-store-{}-{}.json", name, std::process::id()));
        let _ = tokio::fs::remove_file(&path).await;
        (LocalStore::open(&path).await.unwrap(), path)
    }

    #[tokio::test]
    async fn addresses_survive_reopen() {
        let (store, path) = temp_store("reopen").await;
        store.add_address(ProbeKind::Ping, "a.example:25565").await.unwrap();
        store.add_address(ProbeKind::Query, "b.example:25565").await.unwrap();
        drop(store);

        let store = LocalStore::open(&path).await.unwrap();
        assert_eq!(
            store.load_addresses(ProbeKind::Ping).await.unwrap(),
            vec!["a.example:25565".to_string()]
        );
        assert_eq!(
            store.load_addresses(ProbeKind::Query).await.unwrap(),
            vec!["b.example:25565".to_string()]
        );

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn removal_is_idempotent() {
        let (store, path) = temp_store("remove").await;
        store.add_address(ProbeKind::Ping, "a.example:25565").await.unwrap();
        store.remove_address(ProbeKind::Ping, "a.example:25565").await.unwrap();
        store.remove_address(ProbeKind::Ping, "a.example:25565").await.unwrap();
        assert!(store.load_addresses(ProbeKind::Ping).await.unwrap().is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn request_counter_is_monotonic() {
        let (store, path) = temp_store("counter").await;
        assert_eq!(store.request_count().await.unwrap(), 0);
        assert_eq!(store.incr_requests().await.unwrap(), 1);
        assert_eq!(store.incr_requests().await.unwrap(), 2);
        assert_eq!(store.request_count().await.unwrap(), 2);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
