use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal state of a probe as exposed in the public JSON.
///
/// `Error` means the request itself could not be honored (bad address,
/// missing input); a server that was probed and found offline is still
/// `Success` with `online: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingPlayers {
    pub max: i64,
    pub now: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingServer {
    pub name: String,
    pub protocol: i64,
}

/// Result of a TCP server-list-ping probe. Field names are part of the
/// public JSON contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingRecord {
    pub status: RecordStatus,
    pub online: bool,
    pub motd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motd_extra: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motd_formatted: Option<String>,
    pub error: String,
    pub players: PingPlayers,
    pub server: PingServer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub last_online: String,
    pub last_updated: String,
    pub duration: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlayers {
    pub max: i64,
    pub now: i64,
    pub list: Vec<String>,
}

/// Result of a UDP full-stat query probe. Richer than a ping record; same
/// lifecycle semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub status: RecordStatus,
    pub online: bool,
    pub error: String,
    pub motd: String,
    pub version: String,
    pub game_type: String,
    pub game_id: String,
    pub server_mod: String,
    pub map: String,
    pub players: QueryPlayers,
    pub plugins: Vec<String>,
    pub last_online: String,
    pub last_updated: String,
    pub duration: i64,
}

/// Shared lifecycle surface of the two record flavors. The cache engine
/// mutates records exclusively through this trait when applying probe
/// outcomes, so both kinds flow through one code path.
pub trait ServerRecord: Clone + Default + Send + Sync + 'static {
    fn status(&self) -> RecordStatus;
    fn set_status(&mut self, status: RecordStatus);
    fn online(&self) -> bool;
    fn set_online(&mut self, online: bool);
    fn set_error(&mut self, error: &str);
    fn last_online(&self) -> &str;
    fn set_last_online(&mut self, ts: &str);
    fn last_updated(&self) -> &str;
    fn set_last_updated(&mut self, ts: &str);
    fn set_duration(&mut self, nanos: i64);

    /// Synthetic record returned while an offline marker suppresses probing.
    fn offline_placeholder() -> Self {
        let mut record = Self::default();
        record.set_status(RecordStatus::Success);
        record.set_online(false);
        record
    }

    /// Error record for an address that failed fatally.
    fn fatal(error: &str) -> Self {
        let mut record = Self::default();
        record.set_status(RecordStatus::Error);
        record.set_online(false);
        record.set_error(error);
        record
    }

    /// Stamps a successful probe outcome. `last_online` and `last_updated`
    /// always move together on success.
    fn mark_online(&mut self, now: &str) {
        self.set_status(RecordStatus::Success);
        self.set_online(true);
        self.set_error("");
        self.set_last_online(now);
        self.set_last_updated(now);
    }

    /// Stamps a transient failure. `last_online` is left untouched so the
    /// record remembers when the server was last reachable.
    fn mark_unreachable(&mut self, now: &str) {
        self.set_status(RecordStatus::Success);
        self.set_online(false);
        self.set_error("");
        self.set_last_updated(now);
    }
}

impl ServerRecord for PingRecord {
    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    fn online(&self) -> bool {
        self.online
    }

    fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    fn set_error(&mut self, error: &str) {
        self.error = error.to_string();
    }

    fn last_online(&self) -> &str {
        &self.last_online
    }

    fn set_last_online(&mut self, ts: &str) {
        self.last_online = ts.to_string();
    }

    fn last_updated(&self) -> &str {
        &self.last_updated
    }

    fn set_last_updated(&mut self, ts: &str) {
        self.last_updated = ts.to_string();
    }

    fn set_duration(&mut self, nanos: i64) {
        self.duration = nanos;
    }
}

impl ServerRecord for QueryRecord {
    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    fn online(&self) -> bool {
        self.online
    }

    fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    fn set_error(&mut self, error: &str) {
        self.error = error.to_string();
    }

    fn last_online(&self) -> &str {
        &self.last_online
    }

    fn set_last_online(&mut self, ts: &str) {
        self.last_online = ts.to_string();
    }

    fn last_updated(&self) -> &str {
        &self.last_updated
    }

    fn set_last_updated(&mut self, ts: &str) {
        self.last_updated = ts.to_string();
    }

    fn set_duration(&mut self, nanos: i64) {
        self.duration = nanos;
    }
}
