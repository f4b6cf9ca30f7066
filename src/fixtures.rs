//! Audit fixtures
//!
//! Ground truth for the bundled fixtures: which vulnerability patterns the
//! source fixture is known to contain, and the shape of the YAML config
//! fixture. Used by `selfcheck` and the integration tests; the audit run
//! itself never consults these.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Presence of the three planted vulnerability patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VulnerabilityMarkers {
    /// `os.system` called on input.
    pub command_injection: bool,
    /// A `SELECT * FROM` query assembled with `+`.
    pub sql_injection: bool,
    /// Unescaped interpolation into a `<div>` via an f-string.
    pub xss: bool,
}

impl VulnerabilityMarkers {
    pub fn scan(content: &str) -> Self {
        Self {
            command_injection: content.contains("os.system"),
            sql_injection: content.contains("SELECT * FROM") && content.contains('+'),
            xss: content.contains("<div>") && content.contains("f\""),
        }
    }

    pub fn all_present(&self) -> bool {
        self.command_injection && self.sql_injection && self.xss
    }

    /// Labelled markers in a stable order, for reporting.
    pub fn entries(&self) -> [(&'static str, bool); 3] {
        [
            ("Command Injection", self.command_injection),
            ("SQL Injection", self.sql_injection),
            ("XSS", self.xss),
        ]
    }
}

/// The config fixture's three top-level sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFixture {
    #[serde(default)]
    pub application: Mapping,
    #[serde(default)]
    pub database: Mapping,
    #[serde(default)]
    pub security: Mapping,
}

impl ConfigFixture {
    /// Parse YAML text. An empty or `null` document yields empty sections.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value)
    }

    pub fn application_name(&self) -> Option<&str> {
        self.application.get("name").and_then(Value::as_str)
    }

    pub fn security_setting(&self, key: &str) -> Option<&Value> {
        self.security.get(key)
    }
}
