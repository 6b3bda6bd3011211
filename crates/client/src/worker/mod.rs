//! Request interception layer.
//!
//! [`ShellWorker`] sits between the dashboard and the network. Installing it
//! populates a versioned cache namespace with the shell asset set; once
//! active, every GET goes to the network first and falls back to that
//! namespace only when the network fails. Steady-state handling never writes
//! to the cache.
//!
//! ```text
//! Uninstalled --install--> Installing --ok--> Installed --activate--> Active
//!      ^                        |
//!      +--------- err ----------+
//! ```

mod lifecycle;
mod store;

use std::sync::Arc;

use parking_lot::RwLock;
use topview_core::request::resolve;
use topview_core::{AppConfig, CacheEntry, Error, Method, Request};
use url::Url;

use crate::network::Network;

pub use lifecycle::{FetchOutcome, FetchSource, WorkerState};
pub use store::CacheStore;

/// The interception layer for one cache version.
pub struct ShellWorker {
    network: Arc<dyn Network>,
    store: Arc<dyn CacheStore>,
    cache_name: String,
    shell_assets: Vec<Url>,
    state: RwLock<WorkerState>,
}

impl ShellWorker {
    /// Create a worker for the given namespace and shell asset URLs.
    ///
    /// Duplicate assets are dropped, keeping the first occurrence.
    pub fn new(
        network: Arc<dyn Network>, store: Arc<dyn CacheStore>, cache_name: impl Into<String>, shell_assets: Vec<Url>,
    ) -> Self {
        let mut unique: Vec<Url> = Vec::with_capacity(shell_assets.len());
        for asset in shell_assets {
            if !unique.contains(&asset) {
                unique.push(asset);
            }
        }

        Self {
            network,
            store,
            cache_name: cache_name.into(),
            shell_assets: unique,
            state: RwLock::new(WorkerState::Uninstalled),
        }
    }

    /// Create a worker from configuration, resolving shell assets against the
    /// configured origin.
    pub fn from_config(config: &AppConfig, network: Arc<dyn Network>, store: Arc<dyn CacheStore>) -> Result<Self, Error> {
        let origin = config.origin_url().map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let assets = config
            .shell_assets
            .iter()
            .map(|asset| resolve(&origin, asset).map_err(|e| Error::InvalidUrl(format!("{asset}: {e}"))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(network, store, config.cache_name.clone(), assets))
    }

    /// Name of the cache namespace this worker installs into.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Shell asset URLs, de-duplicated and resolved.
    pub fn shell_assets(&self) -> &[Url] {
        &self.shell_assets
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    /// Handle the install event.
    ///
    /// Opens the namespace and fetches every shell asset. Entries are stored
    /// only if every asset answered with a 2xx status; otherwise nothing is
    /// written and [`Error::InstallFailure`] is returned. Re-installing an
    /// installed worker overwrites the same entries and keeps its state.
    ///
    /// A first install that fails, or whose future is dropped before it
    /// finishes, leaves the worker `Uninstalled`.
    pub async fn install(&self) -> Result<(), Error> {
        let pending = {
            let mut state = self.state.write();
            match *state {
                WorkerState::Installing => {
                    return Err(Error::InvalidTransition("install already in progress".into()));
                }
                WorkerState::Uninstalled => {
                    *state = WorkerState::Installing;
                    Some(InstallGuard::new(&self.state))
                }
                _ => None,
            }
        };

        tracing::info!(cache = %self.cache_name, assets = self.shell_assets.len(), "installing shell cache");

        match self.populate().await {
            Ok(stored) => {
                if let Some(guard) = pending {
                    guard.complete(WorkerState::Installed);
                }
                tracing::info!(cache = %self.cache_name, stored, state = self.state().as_str(), "install complete");
                Ok(())
            }
            Err(err) => {
                drop(pending);
                tracing::warn!(cache = %self.cache_name, error = %err, "install failed");
                Err(err)
            }
        }
    }

    async fn populate(&self) -> Result<usize, Error> {
        self.store.open(&self.cache_name).await?;

        let mut entries = Vec::with_capacity(self.shell_assets.len());
        for url in &self.shell_assets {
            let request = Request::from_url(Method::Get, url.clone());
            let response = self
                .network
                .send(&request)
                .await
                .map_err(|e| Error::InstallFailure(format!("{url}: {e}")))?;

            if !response.is_success() {
                return Err(Error::InstallFailure(format!("{url}: status {}", response.status)));
            }

            entries.push(CacheEntry { key_hash: request.cache_key(), method: Method::Get, url: url.to_string(), response });
        }

        let stored = entries.len();
        self.store.put_all(&self.cache_name, entries).await?;
        Ok(stored)
    }

    /// Handle the activate event: take control of all current and future
    /// requests without waiting for older instances.
    pub async fn activate(&self) -> Result<(), Error> {
        let mut state = self.state.write();
        match *state {
            WorkerState::Active => Ok(()),
            WorkerState::Installed => {
                *state = WorkerState::Active;
                tracing::info!(cache = %self.cache_name, "activated; claiming clients");
                Ok(())
            }
            other => Err(Error::InvalidTransition(format!("cannot activate while {}", other.as_str()))),
        }
    }

    /// Handle one intercepted request.
    ///
    /// Non-GET requests, and any request reaching a worker that is not yet
    /// active, go straight to the network with their result unchanged. A GET
    /// on an active worker is served from the network and falls back to the
    /// cache namespace when the network fails.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome, Error> {
        let state = self.state();

        if !request.method.is_cacheable() || state != WorkerState::Active {
            let response = self.network.send(request).await?;
            return Ok(FetchOutcome::new(response, FetchSource::Passthrough));
        }

        let network_err = match self.network.send(request).await {
            Ok(response) => return Ok(FetchOutcome::new(response, FetchSource::Network)),
            Err(err) => err,
        };

        tracing::warn!(url = %request.url, error = %network_err, "network failed; trying shell cache");

        match self.store.lookup(&self.cache_name, &request.cache_key()).await? {
            Some(response) => {
                tracing::debug!(url = %request.url, "shell cache hit");
                Ok(FetchOutcome::new(response, FetchSource::Cache))
            }
            None => Err(Error::NetworkUnavailable(format!("{} {}: {network_err}", request.method, request.url))),
        }
    }
}

/// Rolls an in-flight first install back to `Uninstalled` unless completed.
struct InstallGuard<'a> {
    state: &'a RwLock<WorkerState>,
    armed: bool,
}

impl<'a> InstallGuard<'a> {
    fn new(state: &'a RwLock<WorkerState>) -> Self {
        Self { state, armed: true }
    }

    fn complete(mut self, next: WorkerState) {
        *self.state.write() = next;
        self.armed = false;
    }
}

impl Drop for InstallGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.state.write() = WorkerState::Uninstalled;
        }
    }
}
