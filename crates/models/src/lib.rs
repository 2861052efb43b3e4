mod motd;
mod records;

pub use motd::{Motd, MotdSegment};
pub use records::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which wire protocol produced a record. Each kind feeds its own snapshot
/// cache and its own refresh set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Ping,
    Query,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Ping => "ping",
            ProbeKind::Query => "query",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
