//! Host-side lifecycle driver.
//!
//! The layer never retries on its own. The host owns the retry policy for
//! install and only starts serving once activation has completed, so no
//! request reaches a half-installed worker.

use topview_client::ShellWorker;
use topview_core::{AppConfig, Error};

/// Attempt install up to `config.install_attempts` times.
///
/// Only [`Error::InstallFailure`] is retried; any other error (for example a
/// cache database failure) is returned immediately.
pub async fn install_with_retry(worker: &ShellWorker, config: &AppConfig) -> Result<(), Error> {
    let attempts = config.install_attempts.max(1);
    let mut attempt = 1;

    loop {
        match worker.install().await {
            Ok(()) => return Ok(()),
            Err(err @ Error::InstallFailure(_)) if attempt < attempts => {
                let delay = config.install_backoff(attempt);
                tracing::warn!(attempt, attempts, error = %err, delay_ms = delay.as_millis() as u64, "install failed; retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Install (with retry) then activate.
pub async fn boot(worker: &ShellWorker, config: &AppConfig) -> Result<(), Error> {
    install_with_retry(worker, config).await?;
    worker.activate().await
}
