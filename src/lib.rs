//! Codeaudit: LLM-driven security auditing
//!
//! A single agent, given a file-reading tool and a fix-recording tool, audits
//! source files for vulnerabilities through an OpenAI-compatible
//! chat-completions API and persists one suggested fix per target.

pub mod agent;
pub mod checks;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod orchestration;
pub mod provider;
pub mod tooling;
pub mod tools;
