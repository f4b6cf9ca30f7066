//! Run settings resolved once at startup.
//!
//! Folds the credential and model override from the environment into the
//! loaded config, validates it, and reports a single readiness outcome
//! instead of scattered warnings.

use crate::config::{AuditConfig, ResolvedWorkspace};
use crate::error::ApiError;
use crate::provider::ProviderConfig;
use std::fmt;
use std::path::Path;

/// Environment variable overriding the configured model.
pub const MODEL_ENV: &str = "OPENAI_MODEL_NAME";

/// Value shipped in the sample `.env`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    CredentialMissing,
    CredentialPlaceholder,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::CredentialMissing => f.write_str("API key not set"),
            DegradedReason::CredentialPlaceholder => {
                f.write_str("API key is still the placeholder value")
            }
        }
    }
}

/// Whether a run can be expected to reach the model.
///
/// `Degraded` runs still proceed (demo mode); the provider's rejection is
/// classified when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Degraded(DegradedReason),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    /// False only when no key at all will be sent.
    pub fn credential_configured(&self) -> bool {
        !matches!(self, Readiness::Degraded(DegradedReason::CredentialMissing))
    }
}

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub provider: ProviderConfig,
    pub workspace: ResolvedWorkspace,
    pub max_iterations: usize,
    pub readiness: Readiness,
}

impl RunSettings {
    /// Resolve against the process environment.
    pub fn resolve(
        config: &AuditConfig,
        workspace_root: &Path,
        cli_model: Option<&str>,
    ) -> Result<Self, ApiError> {
        Self::resolve_with(config, workspace_root, cli_model, |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolve with an explicit environment lookup.
    ///
    /// Model precedence: CLI flag, then `OPENAI_MODEL_NAME`, then config.
    /// The key comes from config, else the provider's key variable.
    pub fn resolve_with<F>(
        config: &AuditConfig,
        workspace_root: &Path,
        cli_model: Option<&str>,
        lookup: F,
    ) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut provider = config.provider.clone();

        let non_empty = |value: String| -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        if let Some(model) = cli_model.map(str::to_string).and_then(non_empty) {
            provider.model = model;
        } else if let Some(model) = lookup(MODEL_ENV).and_then(non_empty) {
            provider.model = model;
        }

        provider.api_key = provider.api_key.clone().and_then(non_empty);
        if provider.api_key.is_none() {
            if let Some(env_var) = provider.provider_type.api_key_env_var() {
                provider.api_key = lookup(env_var).and_then(non_empty);
            }
        }

        provider.validate().map_err(ApiError::ConfigError)?;

        if config.run.max_iterations == 0 {
            return Err(ApiError::ConfigError(
                "run.max_iterations must be at least 1".to_string(),
            ));
        }

        let readiness = if !provider.provider_type.requires_api_key() {
            Readiness::Ready
        } else {
            match provider.api_key.as_deref() {
                None => Readiness::Degraded(DegradedReason::CredentialMissing),
                Some(PLACEHOLDER_API_KEY) => {
                    Readiness::Degraded(DegradedReason::CredentialPlaceholder)
                }
                Some(_) => Readiness::Ready,
            }
        };

        Ok(Self {
            provider,
            workspace: config.workspace.resolve(workspace_root),
            max_iterations: config.run.max_iterations,
            readiness,
        })
    }
}
