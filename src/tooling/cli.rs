//! CLI Tooling
//!
//! Command-line interface for the audit agent. Every command loads the
//! workspace configuration once and builds fresh objects for its own use.

use crate::agent::{AgentDescriptor, TaskDescriptor};
use crate::checks::ValidationResult;
use crate::config::{AuditConfig, ConfigLoader, Readiness, RunSettings};
use crate::error::ApiError;
use crate::fixtures::{ConfigFixture, VulnerabilityMarkers};
use crate::logging::LoggingConfig;
use crate::orchestration::{OrchestrationEngine, ToolCallingEngine};
use crate::provider::diagnostics::ProviderDiagnosticsService;
use crate::provider::{DefaultClientResolver, ProviderClientResolver};
use crate::tooling::format::{
    format_banner, format_degraded_warning, format_doctor_text, format_rule, format_run_failure,
    format_run_outcome, format_tools_text, format_validation_result, ConnectivityStatus,
    DoctorReport, ToolsOutput,
};
use crate::tools::{ToolCall, ToolRegistry};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timeout for the `doctor --test-connectivity` model listing.
const CONNECTIVITY_TIMEOUT_SECS: u64 = 10;

/// File name the self-check probes to confirm missing files are reported as text.
const MISSING_PROBE: &str = "nonexistent.py";

const SAMPLE_FIX: &str = r#"import subprocess
import shlex

def execute_user_command(user_input):
    """
    SECURE: Uses subprocess with proper argument handling.
    Prevents command injection by using list arguments.
    """
    args = shlex.split(user_input)
    result = subprocess.run(args, capture_output=True, text=True, timeout=30, check=False)
    return result.returncode
"#;

/// Codeaudit CLI - LLM-driven security auditing
#[derive(Parser)]
#[command(name = "codeaudit")]
#[command(about = "Audit source files for security vulnerabilities with a tool-calling LLM agent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides codeaudit.toml discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (info level unless --log-level is given)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply the logging flags on top of the configured `[logging]` section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        } else if self.verbose {
            config.level = "info".to_string();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the security audit against the workspace fixtures
    Run {
        /// Model to use (overrides OPENAI_MODEL_NAME and config)
        #[arg(long)]
        model: Option<String>,
        /// Read the task description from a file instead of the built-in audit task
        #[arg(long)]
        task_file: Option<String>,
    },
    /// Exercise the tools and fixtures without contacting the provider
    Selfcheck,
    /// Diagnose provider configuration
    Doctor {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Test provider connectivity
        #[arg(long)]
        test_connectivity: bool,
    },
    /// List the tools exposed to the model
    Tools {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the resolved configuration as TOML
    Config,
}

/// Text to print and the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn ok(text: String) -> Self {
        Self { text, exit_code: 0 }
    }

    pub fn failed(text: String) -> Self {
        Self { text, exit_code: 1 }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// CLI context for command execution
pub struct CliContext {
    workspace_root: PathBuf,
    config: AuditConfig,
    resolver: Box<dyn ProviderClientResolver>,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: AuditConfig) -> Self {
        Self {
            workspace_root,
            config,
            resolver: Box::new(DefaultClientResolver),
        }
    }

    /// Replace how provider clients are built.
    pub fn with_resolver(mut self, resolver: Box<dyn ProviderClientResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Run { model, task_file } => {
                self.handle_run(model.as_deref(), task_file.as_deref())
            }
            Commands::Selfcheck => Ok(self.handle_selfcheck()),
            Commands::Doctor {
                format,
                test_connectivity,
            } => self.handle_doctor(format, *test_connectivity),
            Commands::Tools { format } => self.handle_tools(format),
            Commands::Config => self.handle_config(),
        }
    }

    fn handle_run(
        &self,
        model: Option<&str>,
        task_file: Option<&str>,
    ) -> Result<CommandOutput, ApiError> {
        let settings = RunSettings::resolve(&self.config, &self.workspace_root, model)?;
        let workspace = &settings.workspace;

        println!("{}\n", format_banner("Autonomous Code Auditing Agent"));
        if let Readiness::Degraded(reason) = settings.readiness {
            let env_var = settings
                .provider
                .provider_type
                .api_key_env_var()
                .unwrap_or("OPENAI_API_KEY");
            println!("{}", format_degraded_warning(reason, env_var));
        }

        let client = self.resolver.create_provider_client(&settings.provider)?;
        println!("✓ Language model client ready: {}", client.model_name());

        let agent = AgentDescriptor::security_auditor();
        let task = match task_file {
            Some(path) => TaskDescriptor::from_file(path, &workspace.base_dir)?,
            None => TaskDescriptor::security_audit(&workspace.target, &workspace.config_fixture),
        };
        println!("✓ Agent created: {}", agent.role);
        println!("✓ Task created: security audit of {}\n", workspace.target);
        println!("{}\nStarting Code Audit Process...\n{}\n", format_rule(), format_rule());

        let tools = ToolRegistry::for_workspace(&workspace.base_dir, &workspace.output_dir);
        let engine = ToolCallingEngine::new(
            client,
            settings.provider.default_options.clone(),
            settings.max_iterations,
        )
        .with_credential_configured(settings.readiness.credential_configured());

        let rt = tokio::runtime::Runtime::new()?;
        match rt.block_on(engine.kickoff(&agent, &task, &tools)) {
            Ok(outcome) => {
                info!(
                    iterations = outcome.iterations,
                    tool_calls = outcome.invocations.len(),
                    "audit completed"
                );
                Ok(CommandOutput::ok(format_run_outcome(
                    &outcome,
                    &workspace.output_dir,
                )))
            }
            Err(failure) => Ok(CommandOutput::failed(format_run_failure(&failure))),
        }
    }

    /// Offline component checks: tools, fixtures, and descriptors.
    fn handle_selfcheck(&self) -> CommandOutput {
        let workspace = self.config.workspace.resolve(&self.workspace_root);
        let tools = ToolRegistry::for_workspace(&workspace.base_dir, &workspace.output_dir);
        let mut result = ValidationResult::new("Component self-check");

        let target_text = dispatch(&tools, "read_file_tool", json!({ "path": workspace.target }));
        let target_header = format!("File: {}\n\n", workspace.target);
        let read_target = format!("read_file_tool reads {}", workspace.target);
        match target_text.strip_prefix(&target_header) {
            Some(content) => {
                result.add_check(&read_target, true);
                for (name, present) in VulnerabilityMarkers::scan(content).entries() {
                    let check = format!("{} pattern present in {}", name, workspace.target);
                    if present {
                        result.add_check(&check, true);
                    } else {
                        result.fail(&check, format!("{} marker not found", name));
                    }
                }
            }
            None => result.fail(&read_target, target_text.clone()),
        }

        let fixture_text = dispatch(
            &tools,
            "read_file_tool",
            json!({ "path": workspace.config_fixture }),
        );
        let read_fixture = format!("read_file_tool reads {}", workspace.config_fixture);
        if fixture_text.starts_with("File: ") {
            result.add_check(&read_fixture, true);
        } else {
            result.fail(&read_fixture, fixture_text);
        }

        let missing = dispatch(&tools, "read_file_tool", json!({ "path": MISSING_PROBE }));
        let expected = format!("Error: File '{}' not found.", MISSING_PROBE);
        if missing == expected {
            result.add_check("Missing file reported as text", true);
        } else {
            result.fail(
                "Missing file reported as text",
                format!("unexpected read result: {}", missing),
            );
        }

        let fix_text = dispatch(
            &tools,
            "suggest_fix_tool",
            json!({ "path": workspace.target, "suggested_code": SAMPLE_FIX }),
        );
        let report_path = tools.recorder().report_path(&workspace.target);
        if fix_text.contains("✓ Fix suggestion saved to:") && report_path.is_file() {
            result.add_check("suggest_fix_tool writes a report", true);
        } else {
            result.fail("suggest_fix_tool writes a report", fix_text);
        }

        let fixture_path = workspace.base_dir.join(&workspace.config_fixture);
        match load_config_fixture(&fixture_path) {
            Ok(fixture) => {
                result.add_check("Config fixture parses as YAML", true);
                match fixture.application_name() {
                    Some(_) => result.add_check("Config fixture names the application", true),
                    None => result.add_warning("application.name is not set".to_string()),
                }
                if fixture.database.is_empty() || fixture.security.is_empty() {
                    result.add_warning(
                        "database or security section is empty; the audit has less to review"
                            .to_string(),
                    );
                }
            }
            Err(e) => result.fail("Config fixture parses as YAML", format!("{:#}", e)),
        }

        let agent = AgentDescriptor::security_auditor();
        let exposes_both = agent.tool_names() == vec!["read_file_tool", "suggest_fix_tool"];
        if exposes_both && agent.tools == tools.definitions() {
            result.add_check("Agent exposes exactly the two tools", true);
        } else {
            result.fail(
                "Agent exposes exactly the two tools",
                format!("agent tools: {}", agent.tool_names().join(", ")),
            );
        }
        result.add_check("Agent does not delegate", !agent.allow_delegation);

        let text = format_validation_result(&result);
        if result.is_valid() {
            CommandOutput::ok(text)
        } else {
            CommandOutput::failed(text)
        }
    }

    fn handle_doctor(
        &self,
        format: &str,
        test_connectivity: bool,
    ) -> Result<CommandOutput, ApiError> {
        let settings = RunSettings::resolve(&self.config, &self.workspace_root, None)?;
        let provider = &settings.provider;
        let validation =
            ProviderDiagnosticsService::validate_provider(provider, &settings.readiness);

        let connectivity = test_connectivity.then(|| {
            let outcome = self
                .resolver
                .create_provider_client(provider)
                .and_then(|client| {
                    ProviderDiagnosticsService::list_available_models_with_timeout(
                        client.as_ref(),
                        CONNECTIVITY_TIMEOUT_SECS,
                    )
                });
            match outcome {
                Ok(models) => ConnectivityStatus {
                    ok: true,
                    models_reported: models.len(),
                    model_available: models.iter().any(|m| m == &provider.model),
                    error: None,
                },
                Err(e) => ConnectivityStatus {
                    ok: false,
                    models_reported: 0,
                    model_available: false,
                    error: Some(e.to_string()),
                },
            }
        });

        let healthy = validation.is_valid() && connectivity.as_ref().map_or(true, |c| c.ok);
        let report = DoctorReport {
            provider_type: provider.provider_type.slug().to_string(),
            model: provider.model.clone(),
            endpoint: provider
                .normalized_endpoint()
                .unwrap_or_else(|| "-".to_string()),
            api_key: ProviderDiagnosticsService::resolve_api_key_status(
                provider,
                &settings.readiness,
            ),
            ready: settings.readiness.is_ready(),
            max_iterations: settings.max_iterations,
            base_dir: settings.workspace.base_dir.display().to_string(),
            output_dir: settings.workspace.output_dir.display().to_string(),
            validation,
            connectivity,
        };

        let text = if format == "json" {
            serde_json::to_string_pretty(&report)
                .map_err(|e| ApiError::ConfigError(format!("Failed to encode report: {}", e)))?
        } else {
            format_doctor_text(&report)
        };
        Ok(if healthy {
            CommandOutput::ok(text)
        } else {
            CommandOutput::failed(text)
        })
    }

    fn handle_tools(&self, format: &str) -> Result<CommandOutput, ApiError> {
        let workspace = self.config.workspace.resolve(&self.workspace_root);
        let tools = ToolRegistry::for_workspace(&workspace.base_dir, &workspace.output_dir);
        let output = ToolsOutput::from_definitions(&tools.definitions());
        let text = if format == "json" {
            serde_json::to_string_pretty(&output)
                .map_err(|e| ApiError::ConfigError(format!("Failed to encode tools: {}", e)))?
        } else {
            format_tools_text(&output)
        };
        Ok(CommandOutput::ok(text))
    }

    /// Resolved configuration with any configured key masked.
    fn handle_config(&self) -> Result<CommandOutput, ApiError> {
        let mut shown = self.config.clone();
        if shown.provider.api_key.is_some() {
            shown.provider.api_key = Some("********".to_string());
        }
        let text = toml::to_string_pretty(&shown)
            .map_err(|e| ApiError::ConfigError(format!("Failed to encode config: {}", e)))?;
        Ok(CommandOutput::ok(text))
    }
}

fn dispatch(tools: &ToolRegistry, name: &str, arguments: serde_json::Value) -> String {
    tools.dispatch(&ToolCall {
        id: format!("selfcheck_{}", name),
        name: name.to_string(),
        arguments: arguments.to_string(),
    })
}

fn load_config_fixture(path: &Path) -> anyhow::Result<ConfigFixture> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    ConfigFixture::parse(&text).with_context(|| format!("parsing {}", path.display()))
}
