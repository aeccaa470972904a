//! Adapters between the outside world and the application: HTML extraction,
//! the HTTP API and CSV export.

pub mod csv;
pub mod html;
pub mod http;
