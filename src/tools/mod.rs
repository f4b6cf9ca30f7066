//! Tool Capability Table
//!
//! The closed set of capabilities exposed to the model. Each entry pairs a
//! name and a typed input schema with the function that services it;
//! [`ToolRegistry::dispatch`] routes the model's tool calls through the table.
//! Bad calls (unknown name, malformed arguments) come back to the model as
//! text so the conversation can continue.

pub mod read_file;
pub mod suggest_fix;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub use read_file::{FileReadResult, FileReader, ReadFileInput};
pub use suggest_fix::{
    report_file_name, FixRecorder, FixStatus, FixSuggestion, SuggestFixInput,
    PLACEHOLDER_TIMESTAMP,
};

/// A required string field in a tool's input schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub name: &'static str,
    pub description: &'static str,
}

/// Input schema: an object whose fields are all required strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    pub fields: Vec<SchemaField>,
}

impl InputSchema {
    /// JSON Schema form sent to the provider.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|field| {
                (
                    field.name.to_string(),
                    serde_json::json!({
                        "type": "string",
                        "description": field.description,
                    }),
                )
            })
            .collect();
        let required: Vec<&str> = self.fields.iter().map(|field| field.name).collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }
}

/// Tool definition for the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: InputSchema,
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments as produced by the model
    pub arguments: String,
}

/// Every capability the model may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ReadFile,
    SuggestFix,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::ReadFile, Capability::SuggestFix];

    pub fn name(self) -> &'static str {
        match self {
            Capability::ReadFile => "read_file_tool",
            Capability::SuggestFix => "suggest_fix_tool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|capability| capability.name() == name)
    }

    pub fn definition(self) -> ToolDefinition {
        match self {
            Capability::ReadFile => ToolDefinition {
                name: self.name(),
                description: "Reads and returns the complete contents of a specified file. \
                    Use this tool to examine source code files for security vulnerabilities. \
                    Input should be a valid file path relative to the project root.",
                schema: InputSchema {
                    fields: vec![SchemaField {
                        name: "path",
                        description: "The file path to read",
                    }],
                },
            },
            Capability::SuggestFix => ToolDefinition {
                name: self.name(),
                description: "Outputs a suggested code fix in a structured format. \
                    Use this tool to document your security recommendations and provide \
                    safe, refactored code that addresses the identified vulnerabilities. \
                    This simulates a commit suggestion or pull request comment.",
                schema: InputSchema {
                    fields: vec![
                        SchemaField {
                            name: "path",
                            description: "The file path where the fix should be applied",
                        },
                        SchemaField {
                            name: "suggested_code",
                            description: "The suggested fixed code block",
                        },
                    ],
                },
            },
        }
    }
}

/// The capability table bound to concrete reader/recorder instances.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    reader: FileReader,
    recorder: FixRecorder,
}

impl ToolRegistry {
    pub fn new(reader: FileReader, recorder: FixRecorder) -> Self {
        Self { reader, recorder }
    }

    /// Reader rooted at `base_dir`, recorder writing into `output_dir`.
    pub fn for_workspace(base_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self::new(FileReader::new(base_dir), FixRecorder::new(output_dir))
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        &Capability::ALL
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.capabilities()
            .iter()
            .map(|capability| capability.definition())
            .collect()
    }

    pub fn reader(&self) -> &FileReader {
        &self.reader
    }

    pub fn recorder(&self) -> &FixRecorder {
        &self.recorder
    }

    /// Service one tool call and return the text handed back to the model.
    pub fn dispatch(&self, call: &ToolCall) -> String {
        let Some(capability) = Capability::from_name(&call.name) else {
            warn!(tool = %call.name, "model requested unknown tool");
            let available: Vec<&str> = self.capabilities().iter().map(|c| c.name()).collect();
            return format!(
                "Error: unknown tool '{}'. Available tools: {}",
                call.name,
                available.join(", ")
            );
        };

        debug!(tool = capability.name(), call_id = %call.id, "dispatching tool call");
        match capability {
            Capability::ReadFile => match parse_arguments::<ReadFileInput>(capability, call) {
                Ok(input) => self.reader.run(&input),
                Err(message) => message,
            },
            Capability::SuggestFix => match parse_arguments::<SuggestFixInput>(capability, call) {
                Ok(input) => self.recorder.run(&input),
                Err(message) => message,
            },
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    capability: Capability,
    call: &ToolCall,
) -> Result<T, String> {
    serde_json::from_str(&call.arguments).map_err(|e| {
        warn!(tool = capability.name(), error = %e, "malformed tool arguments");
        format!(
            "Error: invalid arguments for {} (expected fields: {}): {}",
            capability.name(),
            capability.definition().schema.field_names().join(", "),
            e
        )
    })
}
