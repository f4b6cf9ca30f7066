use crate::integration::support::{
    seeded_workspace, text_reply, tool_reply, ScriptedClient, ScriptedResolver,
};
use codeaudit::agent::{AgentDescriptor, TaskDescriptor};
use codeaudit::config::readiness::PLACEHOLDER_API_KEY;
use codeaudit::config::AuditConfig;
use codeaudit::error::ProviderError;
use codeaudit::orchestration::{OrchestrationEngine, ToolCallingEngine};
use codeaudit::provider::{CompletionOptions, FailureKind, Role};
use codeaudit::tooling::cli::{CliContext, Commands};
use codeaudit::tools::ToolRegistry;
use serde_json::json;
use std::fs;

fn keyed_config() -> AuditConfig {
    let mut config = AuditConfig::default();
    config.provider.api_key = Some("sk-test".to_string());
    config
}

fn run_command() -> Commands {
    Commands::Run {
        model: None,
        task_file: None,
    }
}

#[test]
fn full_audit_reads_fixtures_and_records_fix() {
    let workspace = seeded_workspace();
    let client = ScriptedClient::new(vec![
        tool_reply("c1", "read_file_tool", json!({ "path": "vulnerable_script.py" })),
        tool_reply("c2", "read_file_tool", json!({ "path": "config.yaml" })),
        tool_reply(
            "c3",
            "suggest_fix_tool",
            json!({
                "path": "vulnerable_script.py",
                "suggested_code": "subprocess.run(shlex.split(user_input))",
            }),
        ),
        text_reply("Command Injection (A03:2021) in execute_user_command."),
    ]);
    let requests = client.requests();
    let context = CliContext::with_config(workspace.path().to_path_buf(), keyed_config())
        .with_resolver(Box::new(ScriptedResolver::new(client)));

    let output = context.execute(&run_command()).unwrap();
    assert!(output.success(), "{}", output.text);
    assert!(output.text.contains("AUDIT COMPLETED"));
    assert!(output
        .text
        .contains("Command Injection (A03:2021) in execute_user_command."));
    assert!(output.text.contains("security_suggestions"));

    let report_path = workspace
        .path()
        .join("fixtures/security_suggestions/vulnerable_script_fix.txt");
    let report = fs::read_to_string(report_path).unwrap();
    assert!(report.contains("File: vulnerable_script.py"));
    assert!(report.contains("Status: SECURITY_FIX_SUGGESTED"));
    assert!(report.contains("Timestamp: 2024-01-01T00:00:00Z"));
    assert!(report.contains("subprocess.run(shlex.split(user_input))"));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 4);
    let first = &requests[0];
    assert_eq!(first.messages[0].role, Role::System);
    assert!(first.messages[0]
        .content
        .as_deref()
        .unwrap()
        .contains("Senior Python Security Auditor"));
    assert!((first.options.temperature.unwrap() - 0.1).abs() < 1e-6);

    let tool_output = requests[1].messages.last().unwrap();
    assert_eq!(tool_output.role, Role::Tool);
    assert!(tool_output.content.as_deref().unwrap().contains("os.system"));
}

#[test]
fn rejected_key_is_reported_as_invalid_credential() {
    let workspace = seeded_workspace();
    let mut config = AuditConfig::default();
    config.provider.api_key = Some(PLACEHOLDER_API_KEY.to_string());
    let client = ScriptedClient::new(vec![Err(ProviderError::Http {
        status: 401,
        code: Some("invalid_api_key".to_string()),
        message: "Incorrect API key provided".to_string(),
    })]);
    let context = CliContext::with_config(workspace.path().to_path_buf(), config)
        .with_resolver(Box::new(ScriptedResolver::new(client)));

    let output = context.execute(&run_command()).unwrap();
    assert_eq!(output.exit_code, 1);
    assert!(output.text.contains("ERROR DURING AUDIT"));
    assert!(output.text.contains(FailureKind::CredentialInvalid.label()));
    assert!(output.text.contains("Incorrect API key provided"));
    assert!(!workspace.path().join("fixtures/security_suggestions").exists());
}

#[test]
fn client_construction_failure_is_fatal() {
    let workspace = seeded_workspace();
    let resolver = ScriptedResolver::new(ScriptedClient::new(Vec::new()));
    let context = CliContext::with_config(workspace.path().to_path_buf(), keyed_config())
        .with_resolver(Box::new(resolver));

    // The first run consumes the only client; the second cannot build one.
    let _ = context.execute(&run_command()).unwrap();
    assert!(context.execute(&run_command()).is_err());
}

#[test]
fn task_file_replaces_builtin_task() {
    let workspace = seeded_workspace();
    fs::write(
        workspace.path().join("fixtures/audit_task.md"),
        "Only review config.yaml for hardcoded secrets.",
    )
    .unwrap();
    let client = ScriptedClient::new(vec![text_reply("Hardcoded secret_key found.")]);
    let requests = client.requests();
    let context = CliContext::with_config(workspace.path().to_path_buf(), keyed_config())
        .with_resolver(Box::new(ScriptedResolver::new(client)));

    let output = context
        .execute(&Commands::Run {
            model: None,
            task_file: Some("audit_task.md".to_string()),
        })
        .unwrap();
    assert!(output.success(), "{}", output.text);

    let requests = requests.lock().unwrap();
    let task = requests[0].messages[1].content.as_deref().unwrap();
    assert!(task.contains("Only review config.yaml for hardcoded secrets."));
}

#[test]
fn bad_tool_calls_are_fed_back_and_the_run_continues() {
    let workspace = seeded_workspace();
    let tools = ToolRegistry::for_workspace(
        workspace.path().join("fixtures"),
        workspace.path().join("fixtures/security_suggestions"),
    );
    let client = ScriptedClient::new(vec![
        tool_reply("c1", "delete_file_tool", json!({ "path": "config.yaml" })),
        tool_reply("c2", "read_file_tool", json!({ "file": "config.yaml" })),
        tool_reply("c3", "read_file_tool", json!({ "path": "../outside.py" })),
        text_reply("done"),
    ]);
    let engine = ToolCallingEngine::new(Box::new(client), CompletionOptions::default(), 10);

    let rt = tokio::runtime::Runtime::new().unwrap();
    let outcome = rt
        .block_on(engine.kickoff(
            &AgentDescriptor::security_auditor(),
            &TaskDescriptor::security_audit("vulnerable_script.py", "config.yaml"),
            &tools,
        ))
        .unwrap();

    assert_eq!(outcome.final_text, "done");
    assert_eq!(outcome.invocations.len(), 3);
    assert!(outcome.invocations[0]
        .output
        .starts_with("Error: unknown tool 'delete_file_tool'"));
    assert!(outcome.invocations[1]
        .output
        .starts_with("Error: invalid arguments for read_file_tool"));
    assert_eq!(
        outcome.invocations[2].output,
        "Error: File '../outside.py' not found."
    );
    assert!(outcome.invoked("read_file_tool"));
    assert!(!outcome.invoked("suggest_fix_tool"));
    assert!(outcome.finished_at >= outcome.started_at);
}

#[test]
fn missing_key_rejection_is_credential_missing() {
    let workspace = seeded_workspace();
    let tools = ToolRegistry::for_workspace(workspace.path(), workspace.path().join("out"));
    let client = ScriptedClient::new(vec![Err(ProviderError::Http {
        status: 401,
        code: None,
        message: "You didn't provide an API key.".to_string(),
    })]);
    let engine = ToolCallingEngine::new(Box::new(client), CompletionOptions::default(), 3)
        .with_credential_configured(false);

    let rt = tokio::runtime::Runtime::new().unwrap();
    let failure = rt
        .block_on(engine.kickoff(
            &AgentDescriptor::security_auditor(),
            &TaskDescriptor::security_audit("vulnerable_script.py", "config.yaml"),
            &tools,
        ))
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::CredentialMissing);
    assert!(failure.to_string().contains("You didn't provide an API key."));
}
