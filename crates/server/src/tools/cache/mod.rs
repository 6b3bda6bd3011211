//! Cache inspection tools.
//!
//! Read-only views of the shell cache; nothing here writes or evicts.

pub mod get;
pub mod keys;
pub mod namespaces;

pub use get::{CacheGetParams, get_impl};
pub use keys::keys_impl;
pub use namespaces::namespaces_impl;
