//! Core types and shared functionality for topview-shell.
//!
//! This crate provides:
//! - Durable cache namespaces with a SQLite backend
//! - Request identity and the request/response values shared across crates
//! - Unified error types
//! - Layered configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod request;

pub use cache::{CacheDb, CacheEntry, EntryInfo, NamespaceInfo};
pub use config::{AppConfig, ConfigError, DEFAULT_CACHE_NAME, DEFAULT_SHELL_ASSETS};
pub use error::Error;
pub use request::{Method, Request, Response};
