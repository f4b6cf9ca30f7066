use crate::checks::ValidationResult;
use crate::config::{DegradedReason, Readiness};
use crate::error::{ApiError, ProviderError};
use crate::provider::profile::{ProviderConfig, ProviderType};
use crate::provider::ModelProviderClient;

pub struct ProviderDiagnosticsService;

impl ProviderDiagnosticsService {
    pub fn resolve_api_key_status(provider: &ProviderConfig, readiness: &Readiness) -> String {
        if !provider.provider_type.requires_api_key() {
            return "Not required".to_string();
        }
        match readiness {
            Readiness::Ready => "Set".to_string(),
            Readiness::Degraded(DegradedReason::CredentialPlaceholder) => {
                "Placeholder value".to_string()
            }
            Readiness::Degraded(DegradedReason::CredentialMissing) => "Not set".to_string(),
        }
    }

    /// Offline checks over the resolved provider settings.
    pub fn validate_provider(provider: &ProviderConfig, readiness: &Readiness) -> ValidationResult {
        let mut result = ValidationResult::new(provider.provider_type.slug());

        result.add_check("Provider type is valid", true);

        if provider.model.trim().is_empty() {
            result.fail("Model is not empty", "Model name cannot be empty".to_string());
        } else {
            result.add_check("Model is not empty", true);
        }

        match (provider.provider_type.api_key_env_var(), readiness) {
            (None, _) => result.add_check("API key not required for local provider", true),
            (Some(_), Readiness::Ready) => result.add_check("API key available", true),
            (Some(env_var), Readiness::Degraded(reason)) => {
                result.add_check("API key available", false);
                result.add_warning(format!(
                    "{} (set {} or provider.api_key); runs will fail at the provider",
                    reason, env_var
                ));
            }
        }

        match &provider.endpoint {
            Some(endpoint) => {
                if ProviderConfig::endpoint_url_is_valid(provider.provider_type, endpoint) {
                    result.add_check("Endpoint URL is valid", true);
                } else {
                    result.fail(
                        "Endpoint URL is valid",
                        format!("Invalid endpoint URL: {}", endpoint),
                    );
                }
            }
            None if provider.provider_type == ProviderType::LocalCustom => {
                result.fail(
                    "Endpoint URL is valid",
                    "Endpoint is required for local custom provider".to_string(),
                );
            }
            None => result.add_check("Endpoint URL (default)", true),
        }

        if let Some(temp) = provider.default_options.temperature {
            if (0.0..=2.0).contains(&temp) {
                result.add_check("Temperature is in valid range (0.0-2.0)", true);
            } else {
                result.fail(
                    "Temperature is in valid range (0.0-2.0)",
                    format!("Temperature must be between 0.0 and 2.0, got {}", temp),
                );
            }
        }

        if let Some(max_tokens) = provider.default_options.max_tokens {
            if max_tokens > 0 {
                result.add_check("Max tokens is positive", true);
            } else {
                result.fail("Max tokens is positive", "Max tokens must be positive".to_string());
            }
        }

        if let Some(top_p) = provider.default_options.top_p {
            if (0.0..=1.0).contains(&top_p) {
                result.add_check("Top-p is in valid range (0.0-1.0)", true);
            } else {
                result.fail(
                    "Top-p is in valid range (0.0-1.0)",
                    format!("Top-p must be between 0.0 and 1.0, got {}", top_p),
                );
            }
        }

        result
    }

    /// Query the provider's model list under a timeout.
    pub fn list_available_models_with_timeout(
        client: &dyn ModelProviderClient,
        timeout_secs: u64,
    ) -> Result<Vec<String>, ApiError> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::ProviderError(format!("Failed to create runtime: {}", e)))?;
        rt.block_on(async {
            tokio::time::timeout(
                std::time::Duration::from_secs(timeout_secs),
                client.list_models(),
            )
            .await
            .map_err(|_| {
                ApiError::ProviderError(format!("API connectivity timeout ({}s)", timeout_secs))
            })?
            .map_err(|e: ProviderError| ApiError::ProviderError(e.to_string()))
        })
    }
}
