//! Tool-calling loop over a [`ModelProviderClient`].

use crate::agent::{render_system_prompt, render_task_prompt, AgentDescriptor, TaskDescriptor};
use crate::orchestration::{OrchestrationEngine, RunFailure, RunOutcome, ToolInvocation};
use crate::provider::{ChatMessage, ChatRequest, CompletionOptions, ModelProviderClient};
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Sent when the iteration cap is reached, before the final tool-free call.
const FINAL_ANSWER_NUDGE: &str = "You have used all available tool calls. \
    Do not call any more tools; give your final answer now based on what you have gathered.";

pub struct ToolCallingEngine {
    client: Box<dyn ModelProviderClient>,
    options: CompletionOptions,
    max_iterations: usize,
    credential_configured: bool,
}

impl ToolCallingEngine {
    pub fn new(
        client: Box<dyn ModelProviderClient>,
        options: CompletionOptions,
        max_iterations: usize,
    ) -> Self {
        Self {
            client,
            options,
            max_iterations: max_iterations.max(1),
            credential_configured: true,
        }
    }

    /// Whether a key is sent; decides how auth rejections are classified.
    pub fn with_credential_configured(mut self, configured: bool) -> Self {
        self.credential_configured = configured;
        self
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    fn fail(&self, error: crate::error::ProviderError) -> RunFailure {
        let failure = RunFailure::classify(error, self.credential_configured);
        warn!(kind = ?failure.kind, error = %failure.source, "run aborted by provider");
        failure
    }
}

#[async_trait]
impl OrchestrationEngine for ToolCallingEngine {
    async fn kickoff(
        &self,
        agent: &AgentDescriptor,
        task: &TaskDescriptor,
        tools: &ToolRegistry,
    ) -> Result<RunOutcome, RunFailure> {
        let started_at = Utc::now();
        let mut messages = vec![
            ChatMessage::system(render_system_prompt(agent)),
            ChatMessage::user(render_task_prompt(task)),
        ];
        let mut invocations = Vec::new();

        info!(model = self.client.model_name(), role = %agent.role, "run started");

        for iteration in 1..=self.max_iterations {
            let request = ChatRequest {
                messages: messages.clone(),
                tools: agent.tools.clone(),
                options: self.options.clone(),
            };
            let response = self
                .client
                .complete(request)
                .await
                .map_err(|e| self.fail(e))?;
            if let Some(usage) = response.usage {
                debug!(
                    iteration,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "completion usage"
                );
            }

            if response.tool_calls.is_empty() {
                let final_text = response.content.unwrap_or_default();
                info!(iterations = iteration, tool_calls = invocations.len(), "run finished");
                return Ok(RunOutcome {
                    final_text,
                    invocations,
                    iterations: iteration,
                    started_at,
                    finished_at: Utc::now(),
                });
            }

            debug!(
                iteration,
                calls = response.tool_calls.len(),
                "model requested tools"
            );
            messages.push(ChatMessage::assistant(
                response.content.clone(),
                response.tool_calls.clone(),
            ));
            for call in &response.tool_calls {
                let output = tools.dispatch(call);
                messages.push(ChatMessage::tool_result(call.id.clone(), output.clone()));
                invocations.push(ToolInvocation {
                    tool: call.name.clone(),
                    arguments: call.arguments.clone(),
                    output,
                });
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "iteration cap reached, forcing final answer"
        );
        messages.push(ChatMessage::user(FINAL_ANSWER_NUDGE));
        let request = ChatRequest {
            messages,
            tools: Vec::new(),
            options: self.options.clone(),
        };
        let response = self
            .client
            .complete(request)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(RunOutcome {
            final_text: response.content.unwrap_or_default(),
            invocations,
            iterations: self.max_iterations + 1,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{ChatResponse, FailureKind, Role};
    use crate::tools::ToolCall;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Replays canned responses and keeps every request it saw.
    struct Scripted {
        replies: Mutex<VecDeque<Result<ChatResponse, ProviderError>>>,
        seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl Scripted {
        fn new(
            replies: Vec<Result<ChatResponse, ProviderError>>,
        ) -> (Box<Self>, Arc<Mutex<Vec<ChatRequest>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let client = Box::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Arc::clone(&seen),
            });
            (client, seen)
        }
    }

    #[async_trait]
    impl ModelProviderClient for Scripted {
        async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProviderError::EmptyResponse))
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec!["scripted".to_string()])
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn tool_reply(id: &str, name: &str, arguments: &str) -> Result<ChatResponse, ProviderError> {
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

    fn text_reply(text: &str) -> Result<ChatResponse, ProviderError> {
        Ok(ChatResponse {
            content: Some(text.to_string()),
            ..ChatResponse::default()
        })
    }

    fn fixture_tools(temp: &TempDir) -> ToolRegistry {
        std::fs::write(temp.path().join("app.py"), "os.system(cmd)\n").unwrap();
        ToolRegistry::for_workspace(temp.path(), temp.path().join("out"))
    }

    fn run(
        engine: &ToolCallingEngine,
        tools: &ToolRegistry,
    ) -> Result<RunOutcome, RunFailure> {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(engine.kickoff(
            &AgentDescriptor::security_auditor(),
            &TaskDescriptor::security_audit("app.py", "config.yaml"),
            tools,
        ))
    }

    #[test]
    fn services_tool_calls_until_final_answer() {
        let temp = TempDir::new().unwrap();
        let tools = fixture_tools(&temp);
        let (client, seen) = Scripted::new(vec![
            tool_reply("c1", "read_file_tool", r#"{"path":"app.py"}"#),
            tool_reply(
                "c2",
                "suggest_fix_tool",
                r#"{"path":"app.py","suggested_code":"subprocess.run([cmd])"}"#,
            ),
            text_reply("Found command injection."),
        ]);
        let engine = ToolCallingEngine::new(client, CompletionOptions::default(), 5);

        let outcome = run(&engine, &tools).unwrap();
        assert_eq!(outcome.final_text, "Found command injection.");
        assert_eq!(outcome.iterations, 3);
        let names: Vec<&str> = outcome.invocations.iter().map(|c| c.tool.as_str()).collect();
        assert_eq!(names, vec!["read_file_tool", "suggest_fix_tool"]);
        assert!(outcome.invocations[0].output.starts_with("File: app.py"));
        assert!(temp.path().join("out").join("app_fix.txt").is_file());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        let last = &seen[2].messages;
        assert_eq!(last[0].role, Role::System);
        assert_eq!(last[1].role, Role::User);
        assert_eq!(last[2].role, Role::Assistant);
        assert_eq!(last[3].role, Role::Tool);
        assert_eq!(last[3].tool_call_id.as_deref(), Some("c1"));
        assert!(seen.iter().all(|request| request.tools.len() == 2));
    }

    #[test]
    fn iteration_cap_forces_one_tool_free_call() {
        let temp = TempDir::new().unwrap();
        let tools = fixture_tools(&temp);
        let (client, seen) = Scripted::new(vec![
            tool_reply("c1", "read_file_tool", r#"{"path":"app.py"}"#),
            tool_reply("c2", "read_file_tool", r#"{"path":"app.py"}"#),
            text_reply("Done."),
        ]);
        let engine = ToolCallingEngine::new(client, CompletionOptions::default(), 2);

        let outcome = run(&engine, &tools).unwrap();
        assert_eq!(outcome.final_text, "Done.");
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.invocations.len(), 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[2].tools.is_empty());
        let nudge = seen[2].messages.last().unwrap();
        assert_eq!(nudge.role, Role::User);
        assert_eq!(nudge.content.as_deref(), Some(FINAL_ANSWER_NUDGE));
    }

    #[test]
    fn missing_content_yields_empty_answer() {
        let temp = TempDir::new().unwrap();
        let tools = fixture_tools(&temp);
        let (client, _) = Scripted::new(vec![Ok(ChatResponse::default())]);
        let engine = ToolCallingEngine::new(client, CompletionOptions::default(), 3);

        let outcome = run(&engine, &tools).unwrap();
        assert_eq!(outcome.final_text, "");
        assert!(outcome.invocations.is_empty());
    }

    #[test]
    fn provider_failure_is_classified() {
        let temp = TempDir::new().unwrap();
        let tools = fixture_tools(&temp);
        let (client, _) = Scripted::new(vec![Err(ProviderError::Http {
            status: 401,
            code: None,
            message: "no key".to_string(),
        })]);
        let engine = ToolCallingEngine::new(client, CompletionOptions::default(), 3)
            .with_credential_configured(false);

        let failure = run(&engine, &tools).unwrap_err();
        assert_eq!(failure.kind, FailureKind::CredentialMissing);
    }
}
