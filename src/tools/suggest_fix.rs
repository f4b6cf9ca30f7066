//! `suggest_fix_tool`: persist a suggested fix as a reviewable text report.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fixed timestamp stamped on every report. Not wall-clock time; kept
/// constant so reports are byte-stable across runs.
pub const PLACEHOLDER_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// Suffix appended to the target's stem to name its report file.
pub const REPORT_SUFFIX: &str = "_fix.txt";

const RULE_WIDTH: usize = 50;

/// Arguments accepted by `suggest_fix_tool`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestFixInput {
    pub path: String,
    pub suggested_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixStatus {
    #[serde(rename = "SECURITY_FIX_SUGGESTED")]
    SecurityFixSuggested,
}

impl FixStatus {
    pub fn label(self) -> &'static str {
        match self {
            FixStatus::SecurityFixSuggested => "SECURITY_FIX_SUGGESTED",
        }
    }
}

/// A suggested fix for one audited file.
#[derive(Debug, Clone, Serialize)]
pub struct FixSuggestion {
    pub file: String,
    pub status: FixStatus,
    pub suggested_code: String,
    pub timestamp: &'static str,
}

impl FixSuggestion {
    pub fn new(file: impl Into<String>, suggested_code: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: FixStatus::SecurityFixSuggested,
            suggested_code: suggested_code.into(),
            timestamp: PLACEHOLDER_TIMESTAMP,
        }
    }

    /// Human-readable report written to disk and returned to the model.
    pub fn render(&self) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        format!(
            "\n=== SECURITY FIX SUGGESTION ===\n\
             File: {file}\n\
             Status: {status}\n\
             Timestamp: {timestamp}\n\
             \n\
             Suggested Code:\n\
             {rule}\n\
             {code}\n\
             {rule}\n\
             \n\
             This fix has been documented and is ready for review.\n",
            file = self.file,
            status = self.status.label(),
            timestamp = self.timestamp,
            rule = rule,
            code = self.suggested_code,
        )
    }
}

/// Report file name for a target: base name minus its last extension, plus
/// [`REPORT_SUFFIX`]. `dir/vulnerable_script.py` gives `vulnerable_script_fix.txt`.
pub fn report_file_name(target: &str) -> String {
    let stem = Path::new(target)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", stem, REPORT_SUFFIX)
}

/// Writes one report per target under an output directory.
#[derive(Debug, Clone)]
pub struct FixRecorder {
    output_dir: PathBuf,
}

impl FixRecorder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn report_path(&self, target: &str) -> PathBuf {
        self.output_dir.join(report_file_name(target))
    }

    /// Write the report, replacing any earlier report for the same target.
    pub fn record(&self, suggestion: &FixSuggestion) -> std::io::Result<(String, PathBuf)> {
        std::fs::create_dir_all(&self.output_dir)?;
        let report = suggestion.render();
        let report_path = self.report_path(&suggestion.file);
        std::fs::write(&report_path, &report)?;
        Ok((report, report_path))
    }

    /// Tool entry point. Failures come back as text; this never errors.
    pub fn suggest(&self, path: &str, suggested_code: &str) -> String {
        let suggestion = FixSuggestion::new(path, suggested_code);
        match self.record(&suggestion) {
            Ok((report, report_path)) => {
                info!(target_file = path, report = %report_path.display(), "fix suggestion saved");
                format!(
                    "{}\n✓ Fix suggestion saved to: {}",
                    report,
                    report_path.display()
                )
            }
            Err(e) => {
                warn!(target_file = path, error = %e, "failed to save fix suggestion");
                format!("Error suggesting fix for '{}': {}", path, e)
            }
        }
    }

    pub fn run(&self, input: &SuggestFixInput) -> String {
        self.suggest(&input.path, &input.suggested_code)
    }
}
