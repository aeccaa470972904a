//! HTTP API over the stored datasets and the update coordinator.

pub mod routes;

pub use routes::{AppState, build_router, serve};
