//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AuditConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the workspace file (if any) and environment.
    pub fn load(workspace_root: &Path) -> Result<AuditConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<AuditConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> AuditConfig {
        AuditConfig::default()
    }
}
