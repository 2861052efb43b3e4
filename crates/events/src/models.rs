use mcpulse_models::ProbeKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionReason {
    /// The address is permanently bad (resolution failure, malformed port).
    Fatal,
    /// The last successful probe is older than the very-old threshold.
    VeryOld,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Ready { addr: String },
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { path: String },
    ConfigCreated { path: String },

    // Persistence
    StorageLoaded { ping: usize, query: usize },
    StorageDisabled,

    // Refresh scheduling
    RefreshEnabled { interval: u64 },
    RefreshDisabled,
    SweepStarted { kind: ProbeKind, addresses: usize },
    SweepCompleted { kind: ProbeKind, duration: Duration },

    // Probe / cache outcomes
    CacheNew { kind: ProbeKind, addr: String },
    CacheEvicted { kind: ProbeKind, addr: String, reason: EvictionReason },
    ProbeTimeout { kind: ProbeKind, addr: String },

    // Abuse
    RateLimited { client: String, count: u32 },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    #[allow(dead_code)]
    pub(super) silent_mode: bool,
}
