//! Defaults applied beneath every other source.

use crate::provider::profile::config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("provider.provider_type", "openai")?
        .set_default("provider.model", DEFAULT_MODEL)?
        .set_default(
            "provider.default_options.temperature",
            DEFAULT_TEMPERATURE as f64,
        )?
        .set_default("run.max_iterations", 15i64)
}
