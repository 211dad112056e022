//! Storage infrastructure: settings file and durable key-value store.
//!
//! - `config`   – Reads and writes the TOML settings file from the
//!   platform-appropriate directory, with defaults on first run.
//! - `kv_store` – The string key-value store the saved configuration lives
//!   in, with a JSON-file adapter and an in-memory adapter.

pub mod config;
pub mod kv_store;

pub use kv_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StoreError};
