use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("storage error: {0}")]
    StorageError(#[from] mcpulse_storage::StorageError),

    #[error("join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
