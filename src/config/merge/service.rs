//! MergeService: orchestrates sources, applies merge policy, deserializes to AuditConfig.

use crate::config::sources::{environment, workspace_file};
use crate::config::AuditConfig;
use config::ConfigError;
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<AuditConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<AuditConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
