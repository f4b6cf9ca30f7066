//! Workspace layout: where fixtures are read from and where fix reports land.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_base_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("security_suggestions")
}

fn default_target() -> String {
    "vulnerable_script.py".to_string()
}

fn default_config_fixture() -> String {
    "config.yaml".to_string()
}

/// Workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory every tool path is joined onto (relative to the workspace root)
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Directory for fix reports (relative to `base_dir`)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Source file the audit task names
    #[serde(default = "default_target")]
    pub target: String,

    /// YAML config fixture the audit task names
    #[serde(default = "default_config_fixture")]
    pub config_fixture: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            output_dir: default_output_dir(),
            target: default_target(),
            config_fixture: default_config_fixture(),
        }
    }
}

/// Workspace paths resolved against a concrete root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWorkspace {
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub target: String,
    pub config_fixture: String,
}

impl WorkspaceConfig {
    /// Absolute entries in the config replace the root rather than nest under it.
    pub fn resolve(&self, workspace_root: &Path) -> ResolvedWorkspace {
        let base_dir = workspace_root.join(&self.base_dir);
        let output_dir = base_dir.join(&self.output_dir);
        ResolvedWorkspace {
            base_dir,
            output_dir,
            target: self.target.clone(),
            config_fixture: self.config_fixture.clone(),
        }
    }
}
