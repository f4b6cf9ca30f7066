//! Environment variable source: CODEAUDIT_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `CODEAUDIT__PROVIDER__MODEL=gpt-4o` sets `provider.model`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("CODEAUDIT")
            .separator("__")
            .try_parsing(true),
    ))
}
