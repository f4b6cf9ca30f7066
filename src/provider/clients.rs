pub mod openai;
pub mod resolver;

pub use openai::OpenAiCompatibleClient;
pub use resolver::{DefaultClientResolver, ProviderClientResolver};
