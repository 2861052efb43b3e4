use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerSettings,
    #[serde(default = "super::defaults::probe_settings")]
    pub probe: ProbeSettings,
    #[serde(default = "super::defaults::refresh_settings")]
    pub refresh: RefreshSettings,
    #[serde(default = "super::defaults::cache_settings")]
    pub cache: CacheSettings,
    #[serde(default = "super::defaults::rate_limit_settings")]
    pub rate_limit: RateLimitSettings,
    #[serde(default = "super::defaults::storage_settings")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "super::defaults::tcp_nodelay")]
    pub tcp_nodelay: bool,
    #[serde(default = "super::defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "super::defaults::max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "super::defaults::enable_compression")]
    pub enable_compression: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeSettings {
    /// Dial (and per-phase read) timeout for the TCP ping handshake, and
    /// the receive timeout for UDP query datagrams.
    #[serde(default = "super::defaults::tcp_timeout_secs")]
    pub tcp_timeout_secs: u64,
    /// Hard wall-clock deadline the refresh scheduler puts around one probe
    /// job, independent of the probe's own timeouts.
    #[serde(default = "super::defaults::job_deadline_secs")]
    pub job_deadline_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshSettings {
    /// Master switch for the background refresh loop. First-touch probing
    /// keeps working when disabled.
    #[serde(default = "super::defaults::refresh_enabled")]
    pub enabled: bool,
    #[serde(default = "super::defaults::refresh_interval_secs")]
    pub interval_secs: u64,
    /// Max concurrent probes per sweep.
    #[serde(default = "super::defaults::refresh_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Negative-cache TTL after a failed probe.
    #[serde(default = "super::defaults::offline_ttl_secs")]
    pub offline_ttl_secs: u64,
    /// Entries whose last success is older than this are evicted on the
    /// next failed probe.
    #[serde(default = "super::defaults::very_old_threshold_secs")]
    pub very_old_threshold_secs: i64,
    /// Optional freshness window for the read path; 0 disables the check
    /// and any cache hit is served as-is.
    #[serde(default)]
    pub max_staleness_secs: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    #[serde(default = "super::defaults::rate_limit_threshold")]
    pub threshold: u32,
    #[serde(default = "super::defaults::rate_limit_decay_secs")]
    pub decay_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// When enabled, the known-address sets and the request counter are
    /// mirrored to `path` and reloaded at startup.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "super::defaults::storage_path")]
    pub path: String,
}
