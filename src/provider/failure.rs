//! Classification of provider failures into a closed set of kinds, each
//! with its own remediation hints.

use crate::error::{ProviderError, TransportKind};
use serde::Serialize;
use std::fmt;

/// Why a run against the provider failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CredentialMissing,
    CredentialInvalid,
    NetworkUnreachable,
    QuotaExceeded,
    Unknown,
}

impl FailureKind {
    /// Classify from the structured error. `credential_configured` is false
    /// when no key was sent, which turns an auth rejection into
    /// `CredentialMissing`.
    pub fn classify(error: &ProviderError, credential_configured: bool) -> Self {
        match error {
            ProviderError::Http { status, code, .. } => {
                let code = code.as_deref().unwrap_or_default();
                if code == "invalid_api_key" || *status == 401 || *status == 403 {
                    if credential_configured {
                        FailureKind::CredentialInvalid
                    } else {
                        FailureKind::CredentialMissing
                    }
                } else if code == "insufficient_quota"
                    || code == "rate_limit_exceeded"
                    || *status == 429
                    || *status == 402
                {
                    FailureKind::QuotaExceeded
                } else {
                    FailureKind::Unknown
                }
            }
            ProviderError::Transport {
                kind: TransportKind::Connect | TransportKind::Timeout,
                ..
            } => FailureKind::NetworkUnreachable,
            ProviderError::Transport { .. }
            | ProviderError::Decode(_)
            | ProviderError::EmptyResponse => FailureKind::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FailureKind::CredentialMissing => "credential missing",
            FailureKind::CredentialInvalid => "credential invalid",
            FailureKind::NetworkUnreachable => "network unreachable",
            FailureKind::QuotaExceeded => "quota or rate limit exceeded",
            FailureKind::Unknown => "unknown failure",
        }
    }

    pub fn hints(self) -> &'static [&'static str] {
        match self {
            FailureKind::CredentialMissing => &[
                "Set OPENAI_API_KEY in the environment or provider.api_key in codeaudit.toml",
                "Run `codeaudit doctor` to see which credential source is in effect",
            ],
            FailureKind::CredentialInvalid => &[
                "The provider rejected the configured API key",
                "Replace placeholder or revoked keys and re-run",
            ],
            FailureKind::NetworkUnreachable => &[
                "Check network connectivity to the provider endpoint",
                "Verify provider.endpoint if you use a self-hosted or proxy API",
                "Raise provider.request_timeout_secs for slow endpoints",
            ],
            FailureKind::QuotaExceeded => &[
                "The provider reported a rate limit or exhausted quota",
                "Wait before re-running, or check billing and usage limits",
            ],
            FailureKind::Unknown => &[
                "Re-run with CODEAUDIT_LOG=debug for details",
                "Run `codeaudit doctor --test-connectivity` to check the provider",
            ],
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
