use crate::error::ApiError;
use crate::provider::CompletionOptions;
use serde::{Deserialize, Serialize};

/// Model used when neither config nor `OPENAI_MODEL_NAME` names one.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Low sampling temperature: audits favor consistency over variety.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_completion_options() -> CompletionOptions {
    CompletionOptions {
        temperature: Some(DEFAULT_TEMPERATURE),
        ..CompletionOptions::default()
    }
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider_type: ProviderType,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; usually left unset and supplied through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Default completion options for this provider.
    #[serde(default = "default_completion_options")]
    pub default_options: CompletionOptions,

    /// HTTP request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            model: default_model(),
            api_key: None,
            endpoint: None,
            default_options: default_completion_options(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "local")]
    LocalCustom,
}

impl ProviderType {
    pub fn default_endpoint(self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("https://api.openai.com/v1"),
            ProviderType::Ollama => Some("http://localhost:11434/v1"),
            ProviderType::LocalCustom => None,
        }
    }

    /// Environment variable carrying the credential, for providers that need one.
    pub fn api_key_env_var(self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Ollama | ProviderType::LocalCustom => None,
        }
    }

    pub fn requires_api_key(self) -> bool {
        self.api_key_env_var().is_some()
    }

    pub fn slug(self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::Ollama => "ollama",
            ProviderType::LocalCustom => "local",
        }
    }
}

/// Connection parameters derived from a validated [`ProviderConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProvider {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderConfig {
    fn endpoint_has_scheme(endpoint: &str) -> bool {
        endpoint.starts_with("http://") || endpoint.starts_with("https://")
    }

    fn infer_endpoint_scheme(provider_type: ProviderType, endpoint: &str) -> String {
        let endpoint = endpoint.trim();
        if provider_type == ProviderType::LocalCustom && !Self::endpoint_has_scheme(endpoint) {
            format!("https://{}", endpoint)
        } else {
            endpoint.to_string()
        }
    }

    pub fn normalized_endpoint(&self) -> Option<String> {
        self.endpoint
            .as_deref()
            .map(|endpoint| Self::infer_endpoint_scheme(self.provider_type, endpoint))
    }

    pub fn endpoint_url_is_valid(provider_type: ProviderType, endpoint: &str) -> bool {
        let endpoint = Self::infer_endpoint_scheme(provider_type, endpoint);
        let Some(rest) = endpoint.split_once("://").map(|(_, rest)| rest) else {
            return false;
        };
        if !Self::endpoint_has_scheme(&endpoint)
            || rest.is_empty()
            || rest.chars().any(char::is_whitespace)
        {
            return false;
        }

        let authority = rest.split('/').next().unwrap_or_default();
        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        let host = if let Some(bracketed) = host_port.strip_prefix('[') {
            match bracketed.find(']') {
                Some(end) => &bracketed[..end],
                None => return false,
            }
        } else {
            host_port.split(':').next().unwrap_or_default()
        };

        if host.is_empty() {
            return false;
        }
        host == "localhost" || host.contains('.') || host.parse::<std::net::IpAddr>().is_ok()
    }

    /// Validate provider configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            if !Self::endpoint_url_is_valid(self.provider_type, endpoint) {
                return Err(format!("Invalid endpoint URL: {}", endpoint));
            }
        } else if self.provider_type == ProviderType::LocalCustom {
            return Err("Endpoint is required for local custom provider".to_string());
        }

        if let Some(temp) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temp
                ));
            }
        }

        if let Some(top_p) = self.default_options.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(format!("Top-p must be between 0.0 and 1.0, got {}", top_p));
            }
        }

        if self.default_options.max_tokens == Some(0) {
            return Err("Max tokens must be positive".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be positive".to_string());
        }

        Ok(())
    }

    /// Resolve connection parameters. A missing key is allowed here; the
    /// provider rejects the request and the failure is classified then.
    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        let base_url = self
            .normalized_endpoint()
            .or_else(|| self.provider_type.default_endpoint().map(str::to_string))
            .ok_or_else(|| {
                ApiError::ProviderNotConfigured(
                    "LocalCustom provider requires endpoint".to_string(),
                )
            })?;

        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty());

        Ok(ModelProvider {
            model: self.model.clone(),
            base_url,
            api_key,
        })
    }
}
