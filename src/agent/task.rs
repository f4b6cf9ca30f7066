//! The audit task.

use crate::agent::prompt::resolve_prompt_path;
use crate::error::ApiError;
use std::path::Path;

/// Natural-language instructions and the shape of the expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub description: String,
    pub expected_output: String,
}

const EXPECTED_OUTPUT: &str = "A comprehensive security audit report that includes:\n\
    1. List of all identified vulnerabilities with descriptions\n\
    2. OWASP classifications for each vulnerability\n\
    3. Assessment of configuration file security settings\n\
    4. A detailed, safe refactored code block for the critical vulnerability\n\
    5. Recommendations for secure coding practices";

impl TaskDescriptor {
    /// Audit `target`, cross-check `config_fixture`, and record one fix.
    pub fn security_audit(target: &str, config_fixture: &str) -> Self {
        let description = format!(
            "Perform a comprehensive security audit with the following steps:\n\n\
             1. Use the read_file_tool to analyze '{target}' and identify \
             all security vulnerabilities present in the code. Look specifically for:\n   \
             - Command Injection vulnerabilities (unsafe command execution)\n   \
             - SQL Injection vulnerabilities (unsafe query construction)\n   \
             - Cross-Site Scripting (XSS) vulnerabilities (unsafe content rendering)\n   \
             - Any other OWASP Top 10 security issues\n\n\
             2. Use the read_file_tool to check '{config}' for related security \
             configuration variables that may impact the vulnerabilities.\n\n\
             3. For each identified vulnerability, provide:\n   \
             - A clear description of the security risk\n   \
             - The potential impact if exploited\n   \
             - OWASP category classification\n\n\
             4. Use the suggest_fix_tool to provide a precise, safe refactored code \
             block for the most critical vulnerability. The fix should:\n   \
             - Follow security best practices\n   \
             - Use safe alternatives (e.g., subprocess.run() with list arguments)\n   \
             - Include proper input validation\n   \
             - Add security comments explaining the fix\n\n\
             Be thorough, precise, and ensure your recommendations follow \
             industry-standard secure coding practices.",
            target = target,
            config = config_fixture,
        );
        Self {
            description,
            expected_output: EXPECTED_OUTPUT.to_string(),
        }
    }

    /// Load the task description from a file; the expected output stays the
    /// audit report shape.
    pub fn from_file(path: &str, base_dir: &Path) -> Result<Self, ApiError> {
        let resolved = resolve_prompt_path(path, base_dir)?;
        let description = std::fs::read_to_string(&resolved).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read task file {}: {}",
                resolved.display(),
                e
            ))
        })?;
        if description.trim().is_empty() {
            return Err(ApiError::ConfigError(format!(
                "Task file {} is empty",
                resolved.display()
            )));
        }
        Ok(Self {
            description,
            expected_output: EXPECTED_OUTPUT.to_string(),
        })
    }
}
