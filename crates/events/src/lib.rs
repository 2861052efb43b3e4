mod bus;
mod models;

pub use models::{AppEvent, EventBus, EvictionReason};
