//! Shared helpers: a scripted provider and a workspace seeded with fixtures.

use async_trait::async_trait;
use codeaudit::error::{ApiError, ProviderError};
use codeaudit::provider::{
    ChatRequest, ChatResponse, ModelProviderClient, ProviderClientResolver, ProviderConfig,
};
use codeaudit::tools::ToolCall;
use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const VULNERABLE: &str = include_str!("../../fixtures/vulnerable_script.py");
pub const CONFIG_YAML: &str = include_str!("../../fixtures/config.yaml");

/// Temp workspace with `fixtures/` holding the bundled fixtures.
pub fn seeded_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("fixtures");
    fs::create_dir_all(&base).unwrap();
    fs::write(base.join("vulnerable_script.py"), VULNERABLE).unwrap();
    fs::write(base.join("config.yaml"), CONFIG_YAML).unwrap();
    temp
}

pub type Reply = Result<ChatResponse, ProviderError>;

pub fn tool_reply(id: &str, name: &str, arguments: serde_json::Value) -> Reply {
    Ok(ChatResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }],
        usage: None,
    })
}

pub fn text_reply(text: &str) -> Reply {
    Ok(ChatResponse {
        content: Some(text.to_string()),
        ..ChatResponse::default()
    })
}

/// In-memory provider replaying canned replies in order.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to every request the client receives.
    pub fn requests(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ModelProviderClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        Ok(vec!["gpt-4".to_string()])
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Hands out one prepared client; later requests fail like a bad config.
pub struct ScriptedResolver {
    client: Mutex<Option<ScriptedClient>>,
}

impl ScriptedResolver {
    pub fn new(client: ScriptedClient) -> Self {
        Self {
            client: Mutex::new(Some(client)),
        }
    }
}

impl ProviderClientResolver for ScriptedResolver {
    fn create_provider_client(
        &self,
        _config: &ProviderConfig,
    ) -> Result<Box<dyn ModelProviderClient>, ApiError> {
        match self.client.lock().unwrap().take() {
            Some(client) => Ok(Box::new(client)),
            None => Err(ApiError::ProviderNotConfigured(
                "scripted client already used".to_string(),
            )),
        }
    }
}
