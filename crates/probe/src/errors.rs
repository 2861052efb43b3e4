use thiserror::Error;

/// Probe failures. The `Display` text matters: the cache engine classifies
/// errors as fatal or transient by matching substrings against it, so the
/// resolution and address-shape variants spell out the canonical markers.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("no such host: {0}")]
    Resolve(String),

    #[error("unknown port: {0}")]
    InvalidPort(String),

    #[error("too many colons in address: {0}")]
    MalformedAddress(String),

    #[error("connection timed out")]
    Timeout,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("status payload error: {0}")]
    Payload(#[from] serde_json::Error),
}
