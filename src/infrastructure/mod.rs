//! Concrete fetchers and dataset stores.

pub mod directory_fetcher;
pub mod file_store;
pub mod http_fetcher;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
