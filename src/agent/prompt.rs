//! Prompt rendering and prompt-file path resolution.

use crate::agent::{AgentDescriptor, TaskDescriptor};
use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Resolve a prompt or task file path.
///
/// Path resolution priority:
/// 1. Absolute path (if starts with `/`)
/// 2. Tilde expansion (if starts with `~/`)
/// 3. Relative to current directory (if starts with `./`)
/// 4. Relative to base_dir
pub fn resolve_prompt_path(path: &str, base_dir: &Path) -> Result<PathBuf, ApiError> {
    if path.starts_with('/') {
        return Ok(PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        let home =
            std::env::var("HOME").map_err(|_| ApiError::ConfigError("HOME not set".to_string()))?;
        return Ok(PathBuf::from(home).join(rest));
    }
    if let Some(rest) = path.strip_prefix("./") {
        let current_dir = std::env::current_dir().map_err(|e| {
            ApiError::ConfigError(format!("Failed to get current directory: {}", e))
        })?;
        return Ok(current_dir.join(rest));
    }
    Ok(base_dir.join(path))
}

/// System prompt: persona plus the tools the model may call.
pub fn render_system_prompt(agent: &AgentDescriptor) -> String {
    let mut prompt = format!(
        "You are {role}. {backstory}\n\nYour personal goal is: {goal}\n",
        role = agent.role,
        backstory = agent.backstory,
        goal = agent.goal,
    );
    if !agent.tools.is_empty() {
        prompt.push_str("\nYou ONLY have access to the following tools:\n");
        for tool in &agent.tools {
            prompt.push_str(&format!(
                "- {} (arguments: {}): {}\n",
                tool.name,
                tool.schema.field_names().join(", "),
                tool.description
            ));
        }
        prompt.push_str(
            "\nCall tools when you need file contents or want to record a fix. \
             When you have everything you need, reply with your final answer as plain text.\n",
        );
    }
    prompt
}

/// User prompt: the task and the shape of the expected answer.
pub fn render_task_prompt(task: &TaskDescriptor) -> String {
    format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.description, task.expected_output
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_and_relative_paths() {
        let base = Path::new("/base");
        assert_eq!(
            resolve_prompt_path("/etc/task.md", base).unwrap(),
            PathBuf::from("/etc/task.md")
        );
        assert_eq!(
            resolve_prompt_path("tasks/audit.md", base).unwrap(),
            PathBuf::from("/base/tasks/audit.md")
        );
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            resolve_prompt_path("./audit.md", base).unwrap(),
            cwd.join("audit.md")
        );
    }

    #[test]
    fn system_prompt_lists_tools_with_arguments() {
        let prompt = render_system_prompt(&AgentDescriptor::security_auditor());
        assert!(prompt.starts_with("You are Senior Python Security Auditor."));
        assert!(prompt.contains("- read_file_tool (arguments: path):"));
        assert!(prompt.contains("- suggest_fix_tool (arguments: path, suggested_code):"));
    }

    #[test]
    fn task_prompt_carries_expected_output() {
        let task = TaskDescriptor::security_audit("a.py", "c.yaml");
        let prompt = render_task_prompt(&task);
        assert!(prompt.starts_with("Current Task: Perform a comprehensive security audit"));
        assert!(prompt.contains(&task.expected_output));
    }
}
