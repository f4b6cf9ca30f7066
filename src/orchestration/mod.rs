//! Orchestration
//!
//! The engine port and the result of a run. A run is one agent working one
//! task, sequentially, exactly once; the engine owns prompting and the
//! tool-call loop, callers supply descriptors and the capability table.

pub mod engine;

use crate::agent::{AgentDescriptor, TaskDescriptor};
use crate::error::ProviderError;
use crate::provider::FailureKind;
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub use engine::ToolCallingEngine;

/// One serviced tool call, in the order the model made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub arguments: String,
    pub output: String,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// The model's final answer, unvalidated.
    pub final_text: String,
    pub invocations: Vec<ToolInvocation>,
    /// Model round-trips made, including a forced final answer.
    pub iterations: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn invoked(&self, tool: &str) -> bool {
        self.invocations.iter().any(|call| call.tool == tool)
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// A run aborted by the provider.
#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct RunFailure {
    pub kind: FailureKind,
    #[source]
    pub source: ProviderError,
}

impl RunFailure {
    pub fn classify(source: ProviderError, credential_configured: bool) -> Self {
        Self {
            kind: FailureKind::classify(&source, credential_configured),
            source,
        }
    }
}

/// Runs an agent against a task with a capability table.
#[async_trait]
pub trait OrchestrationEngine: Send + Sync {
    async fn kickoff(
        &self,
        agent: &AgentDescriptor,
        task: &TaskDescriptor,
        tools: &ToolRegistry,
    ) -> Result<RunOutcome, RunFailure>;
}
