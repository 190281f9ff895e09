use genai::chat::Tool;
use serde_json::{Value, json};

use super::implementations::{self, ToolContext, ToolError};

/// The fixed set of operations the model may invoke.
///
/// A closed enum rather than an open name-to-handler map: dispatch and
/// unknown-name handling are a single exhaustive match, and the declaration
/// set cannot drift from the implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ListFiles,
    ReadFile,
    WriteFile,
    RunScript,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::ListFiles,
        ToolKind::ReadFile,
        ToolKind::WriteFile,
        ToolKind::RunScript,
    ];

    /// Wire name advertised to the model.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::ListFiles => "get_files_info",
            ToolKind::ReadFile => "get_file_content",
            ToolKind::WriteFile => "write_file",
            ToolKind::RunScript => "run_python_file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "get_files_info" => Some(ToolKind::ListFiles),
            "get_file_content" => Some(ToolKind::ReadFile),
            "write_file" => Some(ToolKind::WriteFile),
            "run_python_file" => Some(ToolKind::RunScript),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::ListFiles => {
                "Lists files in the specified directory along with their sizes, \
                 constrained to the working directory."
            }
            ToolKind::ReadFile => {
                "Reads the content of the specified file, up to a maximum number of \
                 characters, constrained to the working directory."
            }
            ToolKind::WriteFile => {
                "Writes content to the specified file, creating parent directories \
                 as needed, constrained to the working directory."
            }
            ToolKind::RunScript => {
                "Executes the specified Python file and returns its output, \
                 constrained to the working directory."
            }
        }
    }

    /// JSON schema for the arguments the model may supply. The working
    /// directory is never exposed as a parameter.
    pub fn schema(self) -> Value {
        match self {
            ToolKind::ListFiles => json!({
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself."
                    }
                }
            }),
            ToolKind::ReadFile => json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "The file to read, relative to the working directory."
                    }
                },
                "required": ["file_path"]
            }),
            ToolKind::WriteFile => json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "The file to write to, relative to the working directory."
                    },
                    "content": {
                        "type": "string",
                        "description": "The content to write to the file."
                    }
                },
                "required": ["file_path", "content"]
            }),
            ToolKind::RunScript => json!({
                "type": "object",
                "properties": {
                    "file_path": {
                        "type": "string",
                        "description": "The Python file to execute, relative to the working directory."
                    }
                },
                "required": ["file_path"]
            }),
        }
    }

    pub fn to_genai_tool(self) -> Tool {
        Tool::new(self.name())
            .with_description(self.description())
            .with_schema(self.schema())
    }

    /// Dispatch to the implementation for this kind.
    pub async fn execute(self, context: &ToolContext, args: Value) -> Result<String, ToolError> {
        match self {
            ToolKind::ListFiles => implementations::get_files_info(context, args).await,
            ToolKind::ReadFile => implementations::get_file_content(context, args).await,
            ToolKind::WriteFile => implementations::write_file(context, args).await,
            ToolKind::RunScript => implementations::run_python_file(context, args).await,
        }
    }
}

/// Tool declarations advertised to the gateway on every request.
pub fn declarations() -> Vec<Tool> {
    ToolKind::ALL.iter().map(|kind| kind.to_genai_tool()).collect()
}
