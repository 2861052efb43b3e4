mod errors;
mod manager;
mod models;
mod offline;
mod outcome;
mod refresh;
mod single_flight;
mod snapshot;
mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use errors::CacheError;
pub use models::{
    CacheManager, CacheTuning, FlightPolicy, OfflineMarkers, ProbeStore, RefreshOrchestrator,
    SingleFlight, SnapshotCache,
};
