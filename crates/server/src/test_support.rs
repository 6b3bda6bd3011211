//! Shared doubles for the server's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use topview_client::{Network, ShellWorker};
use topview_core::{AppConfig, CacheDb, Error, Request, Response};
use url::Url;

/// Network double serving canned responses per URL.
#[derive(Default)]
pub struct StubNetwork {
    responses: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    /// Number of upcoming sends to reject before behaving normally.
    fail_next: AtomicUsize,
    pub calls: AtomicUsize,
}

impl StubNetwork {
    /// A network serving the default shell asset set.
    pub fn with_shell() -> Arc<Self> {
        let network = Self::default();
        network.serve("http://localhost:8080/", Response::new(200, "<html>TopView</html>"));
        network.serve(
            "http://localhost:8080/index.html",
            Response::new(200, "<html>TopView</html>").with_header("content-type", "text/html"),
        );
        network.serve(
            "http://localhost:8080/manifest.json",
            Response::new(200, r#"{"name":"TopView ERP","start_url":"/"}"#)
                .with_header("content-type", "application/manifest+json"),
        );
        Arc::new(network)
    }

    pub fn serve(&self, url: &str, response: Response) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn send(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("connection failed: offline".into()));
        }
        let pending = self.fail_next.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_next.store(pending - 1, Ordering::SeqCst);
            return Err(Error::Network("connection reset".into()));
        }
        self.responses
            .lock()
            .unwrap()
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| Error::Network(format!("dns error: {}", request.url)))
    }
}

pub fn origin() -> Url {
    Url::parse("http://localhost:8080").unwrap()
}

/// Config with no install backoff so retry tests run instantly.
pub fn test_config() -> AppConfig {
    AppConfig { install_backoff_ms: 0, ..Default::default() }
}

/// A worker built from the default config.
pub async fn worker(network: Arc<StubNetwork>) -> (ShellWorker, CacheDb) {
    let db = CacheDb::open_in_memory().await.unwrap();
    let worker = ShellWorker::from_config(&test_config(), network, Arc::new(db.clone())).unwrap();
    (worker, db)
}

/// A worker that has been installed and activated.
pub async fn active_worker(network: Arc<StubNetwork>) -> (ShellWorker, CacheDb) {
    let (worker, db) = worker(network).await;
    worker.install().await.unwrap();
    worker.activate().await.unwrap();
    (worker, db)
}
