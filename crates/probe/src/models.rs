use crate::errors::ProbeError;
use mcpulse_models::{ProbeKind, ServerRecord};
use std::net::SocketAddr;

/// Error-message substrings that mark an address as permanently bad at the
/// network layer, shared by both probe kinds.
pub const FATAL_NETWORK_MARKERS: &[&str] = &[
    "no such host",
    "no route",
    "unknown port",
    "too many colons in address",
    "invalid argument",
];

/// A probe capability: one network roundtrip against a normalized address,
/// yielding that kind's record on success.
#[async_trait::async_trait]
pub trait Probe: Send + Sync + 'static {
    type Record: ServerRecord;

    /// Which snapshot cache this probe feeds.
    fn kind(&self) -> ProbeKind;

    /// Substrings that classify an error as fatal rather than transient.
    /// Kept as data so upstream error wording can be tuned without touching
    /// the outcome-application logic.
    fn fatal_markers(&self) -> &'static [&'static str];

    async fn probe(&self, addr: &str) -> Result<Self::Record, ProbeError>;
}

/// Terminal classification of a raw probe result.
#[derive(Debug)]
pub enum ProbeOutcome<R> {
    Success(R),
    Transient(ProbeError),
    Fatal(ProbeError),
}

/// Sorts a raw probe result into the outcome the cache engine acts on.
/// Matching is case-insensitive so platform spellings of the same failure
/// classify alike.
pub fn classify<R>(result: Result<R, ProbeError>, markers: &[&str]) -> ProbeOutcome<R> {
    match result {
        Ok(record) => ProbeOutcome::Success(record),
        Err(err) => {
            let message = err.to_string().to_lowercase();
            if markers.iter().any(|marker| message.contains(marker)) {
                ProbeOutcome::Fatal(err)
            } else {
                ProbeOutcome::Transient(err)
            }
        }
    }
}

/// Validates the `host:port` shape and resolves the host. Every failure
/// mode maps onto an error whose message carries the matching fatal marker.
pub(crate) async fn resolve(addr: &str) -> Result<SocketAddr, ProbeError> {
    if addr.matches(':').count() > 1 {
        return Err(ProbeError::MalformedAddress(addr.to_string()));
    }

    let port = match addr.rsplit_once(':') {
        Some((_, port)) => port,
        None => return Err(ProbeError::InvalidPort(addr.to_string())),
    };
    if port.parse::<u16>().is_err() {
        return Err(ProbeError::InvalidPort(port.to_string()));
    }

    match tokio::net::lookup_host(addr).await {
        Ok(mut resolved) => resolved
            .next()
            .ok_or_else(|| ProbeError::Resolve(addr.to_string())),
        Err(_) => Err(ProbeError::Resolve(addr.to_string())),
    }
}
