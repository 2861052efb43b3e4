use serde::{Deserialize, Serialize};

/// Query parameters of the two read endpoints. The port stays a string so
/// a malformed value reaches the probe and classifies as a fatal address
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct AddressParams {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub port: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    pub error: String,
    pub try_after: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: u64,
    pub time: i64,
}
