//! Configuration
//!
//! Layered configuration for an audit run: built-in defaults, an optional
//! `codeaudit.toml` in the workspace root (or an explicit file), then the
//! `CODEAUDIT__*` environment overlay. Credentials and the model override are
//! folded in once by [`RunSettings`].

pub mod facade;
pub mod merge;
pub mod readiness;
pub mod sources;
pub mod workspace;

use crate::logging::LoggingConfig;
use crate::provider::ProviderConfig;
use serde::{Deserialize, Serialize};

pub use facade::ConfigLoader;
pub use readiness::{DegradedReason, Readiness, RunSettings};
pub use workspace::{ResolvedWorkspace, WorkspaceConfig};

/// Name of the optional per-workspace config file.
pub const WORKSPACE_CONFIG_FILE: &str = "codeaudit.toml";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Orchestration loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Upper bound on model round-trips that may request tools.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_max_iterations() -> usize {
    15
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}
