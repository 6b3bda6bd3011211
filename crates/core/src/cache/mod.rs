//! SQLite-backed durable cache for shell assets.
//!
//! Entries live in versioned namespaces. A namespace is populated at install
//! time and read during steady-state fallback; nothing here evicts.

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod namespaces;

pub use crate::Error;

pub use connection::CacheDb;
pub use namespaces::{CacheEntry, EntryInfo, NamespaceInfo};
