//! `read_file_tool`: return a file's contents to the model.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Arguments accepted by `read_file_tool`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadFileInput {
    pub path: String,
}

/// Outcome of a read. Every variant renders to text the model can consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReadResult {
    Found { path: String, content: String },
    NotFound { path: String },
    Error { path: String, message: String },
}

impl FileReadResult {
    pub fn path(&self) -> &str {
        match self {
            FileReadResult::Found { path, .. }
            | FileReadResult::NotFound { path }
            | FileReadResult::Error { path, .. } => path,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FileReadResult::Found { .. })
    }
}

impl fmt::Display for FileReadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileReadResult::Found { path, content } => write!(f, "File: {}\n\n{}", path, content),
            FileReadResult::NotFound { path } => write!(f, "Error: File '{}' not found.", path),
            FileReadResult::Error { path, message } => {
                write!(f, "Error reading file '{}': {}", path, message)
            }
        }
    }
}

/// Reads files relative to a fixed base directory.
///
/// The requested path is joined onto the base as-is: `..` segments and
/// absolute paths are not rejected.
#[derive(Debug, Clone)]
pub struct FileReader {
    base_dir: PathBuf,
}

impl FileReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn read(&self, path: &str) -> FileReadResult {
        let file_path = self.base_dir.join(path);

        if !file_path.exists() {
            debug!(path, resolved = %file_path.display(), "file not found");
            return FileReadResult::NotFound {
                path: path.to_string(),
            };
        }

        match std::fs::read_to_string(&file_path) {
            Ok(content) => {
                debug!(path, bytes = content.len(), "read file");
                FileReadResult::Found {
                    path: path.to_string(),
                    content,
                }
            }
            Err(e) => {
                warn!(path, error = %e, "failed to read file");
                FileReadResult::Error {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Tool entry point: the rendered read outcome.
    pub fn run(&self, input: &ReadFileInput) -> String {
        self.read(&input.path).to_string()
    }
}
