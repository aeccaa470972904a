//! Application layer: the refresh pipeline and the single-flight
//! coordinator that runs it in the background.

pub mod coordinator;
pub mod pipeline;
