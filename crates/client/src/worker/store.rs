//! The durable cache store as seen by the interception layer.

use async_trait::async_trait;
use topview_core::{CacheDb, CacheEntry, Error, Response};

/// Durable cache store consumed by [`super::ShellWorker`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open a namespace, creating it if it doesn't exist.
    async fn open(&self, namespace: &str) -> Result<(), Error>;

    /// Store every entry or none of them.
    async fn put_all(&self, namespace: &str, entries: Vec<CacheEntry>) -> Result<(), Error>;

    /// Look up a single entry by request identity.
    async fn lookup(&self, namespace: &str, key_hash: &str) -> Result<Option<Response>, Error>;
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn open(&self, namespace: &str) -> Result<(), Error> {
        self.open_namespace(namespace).await
    }

    async fn put_all(&self, namespace: &str, entries: Vec<CacheEntry>) -> Result<(), Error> {
        self.put_entries(namespace, entries).await
    }

    async fn lookup(&self, namespace: &str, key_hash: &str) -> Result<Option<Response>, Error> {
        self.match_entry(namespace, key_hash).await
    }
}
