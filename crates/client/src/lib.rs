//! Client side of topview-shell.
//!
//! This crate provides the network primitive and the request interception
//! layer that sits between the dashboard and the network.

pub mod network;
pub mod worker;

pub use network::{HttpNetwork, Network, NetworkConfig};
pub use worker::{CacheStore, FetchOutcome, FetchSource, ShellWorker, WorkerState};
