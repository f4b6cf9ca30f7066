pub mod config;

pub use self::config::{ModelProvider, ProviderConfig, ProviderType};
