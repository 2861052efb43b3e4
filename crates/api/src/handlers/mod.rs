mod client;
mod counter;
mod lookup;
mod models;
mod query;
mod state;
mod stats;
mod status;

pub use counter::track_requests;
pub use models::AppState;
pub use query::server_query;
pub use stats::{hi, stats};
pub use status::server_status;
