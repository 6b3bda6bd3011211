//! Worker lifecycle states and fetch outcomes.

use serde::{Deserialize, Serialize};
use topview_core::Response;

/// Lifecycle state of a [`super::ShellWorker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Nothing cached yet, or the last install failed
    #[default]
    Uninstalled,
    /// Shell assets are being fetched
    Installing,
    /// Namespace populated, waiting for activation
    Installed,
    /// Controlling every request
    Active,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninstalled => "uninstalled",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Active => "active",
        }
    }

    /// Whether the namespace has been populated by a successful install.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed | Self::Active)
    }
}

/// Where a fetch response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FetchSource {
    /// Fresh response from the network
    Network,
    /// Network failed; served from the shell cache
    Cache,
    /// Not controlled by the layer (non-GET, or worker not active)
    Passthrough,
}

/// A response together with its source.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: Response,
    pub source: FetchSource,
}

impl FetchOutcome {
    pub(crate) fn new(response: Response, source: FetchSource) -> Self {
        Self { response, source }
    }
}
