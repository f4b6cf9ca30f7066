//! The security auditor persona.

use crate::tools::{Capability, ToolDefinition};

/// Static agent configuration handed to the orchestration engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<ToolDefinition>,
    /// Single-agent runs never hand work to another agent.
    pub allow_delegation: bool,
}

impl AgentDescriptor {
    /// Senior Python Security Auditor equipped with the read and fix tools.
    pub fn security_auditor() -> Self {
        Self {
            role: "Senior Python Security Auditor".to_string(),
            goal: "Meticulously analyze Python code for security vulnerabilities, \
                identify OWASP Top 10 issues (SQL Injection, XSS, Command Injection, etc.), \
                and provide industry-standard, secure code fixes."
                .to_string(),
            backstory: "You are a highly experienced security professional with over 15 years \
                of expertise in application security. You meticulously review code for \
                OWASP Top 10 vulnerabilities including SQL Injection (SQLi), \
                Cross-Site Scripting (XSS), Command Injection, and other security flaws. \
                You have a deep understanding of secure coding practices and always \
                suggest industry-standard fixes that follow security best practices. \
                Your recommendations are precise, actionable, and help developers \
                write more secure code."
                .to_string(),
            tools: Capability::ALL
                .iter()
                .map(|capability| capability.definition())
                .collect(),
            allow_delegation: false,
        }
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name).collect()
    }
}
