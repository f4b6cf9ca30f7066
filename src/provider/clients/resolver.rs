use crate::error::ApiError;
use crate::provider::clients::OpenAiCompatibleClient;
use crate::provider::profile::ProviderConfig;
use crate::provider::ModelProviderClient;
use std::time::Duration;

/// Builds a client for a provider configuration.
pub trait ProviderClientResolver: Send + Sync {
    fn create_provider_client(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ModelProviderClient>, ApiError>;
}

/// Every supported provider speaks the OpenAI chat-completions dialect.
pub struct DefaultClientResolver;

impl ProviderClientResolver for DefaultClientResolver {
    fn create_provider_client(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ModelProviderClient>, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        let provider = config.to_model_provider()?;
        let client = OpenAiCompatibleClient::new(
            provider,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Box::new(client))
    }
}
