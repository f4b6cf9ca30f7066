//! Console rendering for the CLI: banners, check tables, run results.

use crate::checks::ValidationResult;
use crate::config::DegradedReason;
use crate::orchestration::{RunFailure, RunOutcome};
use crate::tools::ToolDefinition;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

const RULE_WIDTH: usize = 70;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Title between two heavy rules.
pub fn format_banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n  {}\n{rule}", title.bold())
}

pub fn format_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn mark(passed: bool) -> String {
    if passed {
        format!("{}", "✓".green())
    } else {
        format!("{}", "✗".red())
    }
}

pub fn format_degraded_warning(reason: DegradedReason, env_var: &str) -> String {
    let mut out = format!("{} {}\n", "⚠".yellow(), format!("WARNING: {}", reason).yellow());
    out.push_str(&format!(
        "Set {} (or provider.api_key in codeaudit.toml) to run a real audit.\n",
        env_var
    ));
    out.push_str("Continuing anyway; the provider will reject the request without a valid key.\n");
    out
}

/// Checks as a table, followed by errors, warnings and a summary line.
pub fn format_validation_result(result: &ValidationResult) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&result.subject));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Check"]);
    for (description, passed) in &result.checks {
        table.add_row(vec![mark(*passed), description.clone()]);
    }
    out.push_str(&format!("{}\n", table));

    if !result.errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in &result.errors {
            out.push_str(&format!("  {} {}\n", mark(false), error));
        }
    }
    if !result.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            out.push_str(&format!("  {} {}\n", "⚠".yellow(), warning));
        }
    }

    out.push_str(&format!(
        "\nValidation {}: {}/{} checks passed, {} errors found\n",
        if result.is_valid() { "passed" } else { "failed" },
        result.passed_checks(),
        result.total_checks(),
        result.errors.len()
    ));
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub required: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsOutput {
    pub tools: Vec<ToolEntry>,
    pub total: usize,
}

impl ToolsOutput {
    pub fn from_definitions(definitions: &[ToolDefinition]) -> Self {
        let tools: Vec<ToolEntry> = definitions
            .iter()
            .map(|definition| ToolEntry {
                name: definition.name,
                description: definition.description,
                required: definition.schema.field_names(),
            })
            .collect();
        let total = tools.len();
        Self { tools, total }
    }
}

pub fn format_tools_text(output: &ToolsOutput) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Tools"));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Tool", "Arguments", "Description"]);
    for tool in &output.tools {
        table.add_row(vec![
            tool.name.to_string(),
            tool.required.join(", "),
            tool.description.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\nTotal: {} tools.\n", table, output.total));
    out
}

/// Result of `doctor --test-connectivity`.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityStatus {
    pub ok: bool,
    pub models_reported: usize,
    pub model_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub provider_type: String,
    pub model: String,
    pub endpoint: String,
    pub api_key: String,
    pub ready: bool,
    pub max_iterations: usize,
    pub base_dir: String,
    pub output_dir: String,
    pub validation: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<ConnectivityStatus>,
}

pub fn format_doctor_text(report: &DoctorReport) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Provider"));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["Type", report.provider_type.as_str()]);
    table.add_row(vec!["Model", report.model.as_str()]);
    table.add_row(vec!["Endpoint", report.endpoint.as_str()]);
    table.add_row(vec!["API key", report.api_key.as_str()]);
    table.add_row(vec!["Ready", if report.ready { "yes" } else { "no" }]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Workspace")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["Base directory", report.base_dir.as_str()]);
    table.add_row(vec!["Output directory", report.output_dir.as_str()]);
    table.add_row(vec![
        "Max iterations".to_string(),
        report.max_iterations.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format_validation_result(&report.validation));

    if let Some(connectivity) = &report.connectivity {
        out.push('\n');
        if connectivity.ok {
            out.push_str(&format!(
                "{} API connectivity: OK ({} models reported)\n",
                mark(true),
                connectivity.models_reported
            ));
            if connectivity.model_available {
                out.push_str(&format!("{} Model '{}' is available\n", mark(true), report.model));
            } else {
                out.push_str(&format!(
                    "{} Model '{}' not reported by the endpoint\n",
                    mark(false),
                    report.model
                ));
            }
        } else {
            out.push_str(&format!(
                "{} API connectivity failed: {}\n",
                mark(false),
                connectivity.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    out
}

pub fn format_run_outcome(outcome: &RunOutcome, output_dir: &Path) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format_banner("AUDIT COMPLETED"));
    out.push_str("\n\n");
    out.push_str(&outcome.final_text);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Model round-trips: {}, tool calls: {}, elapsed: {}s\n",
        outcome.iterations,
        outcome.invocations.len(),
        outcome.elapsed().num_seconds()
    ));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str(&format!(
        "\nCheck the '{}' folder for detailed fix suggestions.\n",
        output_dir.display()
    ));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out
}

pub fn format_run_failure(failure: &RunFailure) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format_banner("ERROR DURING AUDIT"));
    out.push_str(&format!(
        "\n{} {}\n  {}\n\n",
        mark(false),
        failure.kind.label().red().bold(),
        failure.source
    ));
    out.push_str("What to check:\n");
    for (index, hint) in failure.kind.hints().iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, hint));
    }
    out
}
