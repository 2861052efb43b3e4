mod errors;
mod models;
mod ping;
mod query;
mod wire;

pub use errors::ProbeError;
pub use models::{classify, Probe, ProbeOutcome, FATAL_NETWORK_MARKERS};
pub use ping::PingProbe;
pub use query::QueryProbe;
