/// Default values for configuration fields

pub fn tcp_nodelay() -> bool {
    true
}

pub fn timeout_secs() -> u64 {
    60
}

pub fn allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

pub fn max_concurrent_requests() -> usize {
    1000
}

pub fn enable_compression() -> bool {
    true
}

pub fn tcp_timeout_secs() -> u64 {
    2
}

pub fn job_deadline_secs() -> u64 {
    5
}

pub fn refresh_enabled() -> bool {
    true
}

pub fn refresh_interval_secs() -> u64 {
    60
}

pub fn refresh_concurrency() -> usize {
    50
}

pub fn offline_ttl_secs() -> u64 {
    60
}

pub fn very_old_threshold_secs() -> i64 {
    24 * 60 * 60
}

pub fn rate_limit_threshold() -> u32 {
    5
}

pub fn rate_limit_decay_secs() -> u64 {
    1
}

pub fn storage_path() -> String {
    "mcpulse-data.json".to_string()
}

pub fn probe_settings() -> super::models::ProbeSettings {
    super::models::ProbeSettings {
        tcp_timeout_secs: tcp_timeout_secs(),
        job_deadline_secs: job_deadline_secs(),
    }
}

pub fn refresh_settings() -> super::models::RefreshSettings {
    super::models::RefreshSettings {
        enabled: refresh_enabled(),
        interval_secs: refresh_interval_secs(),
        concurrency: refresh_concurrency(),
    }
}

pub fn cache_settings() -> super::models::CacheSettings {
    super::models::CacheSettings {
        offline_ttl_secs: offline_ttl_secs(),
        very_old_threshold_secs: very_old_threshold_secs(),
        max_staleness_secs: 0,
    }
}

pub fn rate_limit_settings() -> super::models::RateLimitSettings {
    super::models::RateLimitSettings {
        threshold: rate_limit_threshold(),
        decay_interval_secs: rate_limit_decay_secs(),
    }
}

pub fn storage_settings() -> super::models::StorageSettings {
    super::models::StorageSettings {
        enabled: false,
        path: storage_path(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# MCPulse Configuration
# ===============================================================================

[server]
host = "0.0.0.0"                     # Server bind address (0.0.0.0 = all interfaces)
port = 8080                          # Server port
tcp_nodelay = true                   # Disable Nagle's algorithm (lower latency)
timeout_secs = 60                    # Request timeout in seconds
max_concurrent_requests = 1000       # Max simultaneous connections
enable_compression = true            # HTTP compression (gzip)

# CORS
allowed_origins = ["*"]              # "*" = all origins | ["https://example.com"] for production

[probe]
tcp_timeout_secs = 2                 # TCP dial/read timeout for ping probes
job_deadline_secs = 5                # Hard per-probe deadline in the refresh scheduler

[refresh]
enabled = true                       # Background refresh of known servers
interval_secs = 60                   # Sweep cadence in seconds
concurrency = 50                     # Max concurrent probes per sweep

[cache]
offline_ttl_secs = 60                # How long a failed probe suppresses re-probing
very_old_threshold_secs = 86400      # Evict entries not seen online for this long
max_staleness_secs = 0               # Re-probe cache hits older than this (0 = serve any hit)

[rate_limit]
threshold = 5                        # Failing first-touch probes allowed per client
decay_interval_secs = 1              # Counter decay sweep cadence

[storage]
enabled = false                      # Persist known servers and the request counter
path = "mcpulse-data.json"           # Persistence file location
"#;
