//! Tool implementations
//!
//! Each tool follows the same pattern:
//! 1. Parse arguments from JSON
//! 2. Resolve the target through the sandbox
//! 3. Execute the operation
//! 4. Return the result as a string, or a `ToolError`
//!
//! Nothing here panics or propagates an I/O error upward; every failure
//! becomes a `ToolError` that the executor renders into the model-visible
//! `Error: ...` payload.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;

use crate::constants::{MAX_READ_CHARS, SCRIPT_TIMEOUT_SECS};

use super::sandbox::Sandbox;

/// Interpreter configuration for the run tool.
#[derive(Debug, Clone)]
pub struct ScriptLanguage {
    pub name: &'static str,
    pub interpreter: &'static str,
    pub extension: &'static str,
}

pub const PYTHON: ScriptLanguage = ScriptLanguage {
    name: "Python",
    interpreter: "python3",
    extension: "py",
};

/// Fixed per-run configuration merged with the model-supplied arguments.
/// The model cannot override any of this: tool argument structs simply
/// have no fields for it.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub sandbox: Sandbox,
    pub max_read_chars: usize,
    pub script_language: ScriptLanguage,
    pub script_timeout: Duration,
}

impl ToolContext {
    pub fn new(sandbox: Sandbox) -> Self {
        Self {
            sandbox,
            max_read_chars: MAX_READ_CHARS,
            script_language: PYTHON,
            script_timeout: Duration::from_secs(SCRIPT_TIMEOUT_SECS),
        }
    }
}

/// Failure of a single tool invocation. The `Display` text is what the
/// model sees, behind an `Error: ` prefix added by the executor.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Cannot {operation} \"{path}\" as it is outside the permitted working directory")]
    OutsideSandbox {
        operation: &'static str,
        path: String,
    },
    #[error("\"{0}\" is not a directory")]
    NotADirectory(String),
    #[error("Failed to list \"{path}\": {source}")]
    List {
        path: String,
        source: std::io::Error,
    },
    #[error("File not found or is not a regular file: \"{0}\"")]
    NotARegularFile(String),
    #[error("Failed to read \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("creating directory: {0}")]
    CreateDir(std::io::Error),
    #[error("\"{0}\" is a directory, not a file")]
    IsADirectory(String),
    #[error("Failed to write to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("File \"{0}\" not found.")]
    ScriptNotFound(String),
    #[error("\"{path}\" is not a {language} file.")]
    NotAScript {
        path: String,
        language: &'static str,
    },
    #[error("executing {language} file: {reason}")]
    Exec {
        language: &'static str,
        reason: String,
    },
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArgs {
        tool: &'static str,
        source: serde_json::Error,
    },
}

fn parse_args<T: DeserializeOwned>(tool: &'static str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|source| ToolError::InvalidArgs { tool, source })
}

#[derive(Deserialize)]
struct ListFilesArgs {
    #[serde(default)]
    directory: Option<String>,
}

#[derive(Deserialize)]
struct ReadFileArgs {
    file_path: String,
}

#[derive(Deserialize)]
struct WriteFileArgs {
    file_path: String,
    content: String,
}

#[derive(Deserialize)]
struct RunScriptArgs {
    file_path: String,
}

/// List the immediate children of a directory inside the sandbox.
/// One line per entry: `- <name>: file_size:<bytes> bytes, is_dir=<bool>`.
pub async fn get_files_info(context: &ToolContext, args: Value) -> Result<String, ToolError> {
    let args: ListFilesArgs = parse_args("get_files_info", args)?;
    let directory = args.directory.unwrap_or_default();

    let target = context
        .sandbox
        .resolve(&directory)
        .map_err(|_| ToolError::OutsideSandbox {
            operation: "list",
            path: directory.clone(),
        })?;

    if !target.is_dir() {
        return Err(ToolError::NotADirectory(directory));
    }

    let mut lines = Vec::new();
    let mut dir_reader = tokio::fs::read_dir(&target)
        .await
        .map_err(|source| ToolError::List {
            path: directory.clone(),
            source,
        })?;

    while let Some(entry) = dir_reader
        .next_entry()
        .await
        .map_err(|source| ToolError::List {
            path: directory.clone(),
            source,
        })?
    {
        let metadata = entry
            .metadata()
            .await
            .map_err(|source| ToolError::List {
                path: directory.clone(),
                source,
            })?;
        lines.push(format!(
            "- {}: file_size:{} bytes, is_dir={}",
            entry.file_name().to_string_lossy(),
            metadata.len(),
            metadata.is_dir()
        ));
    }

    lines.sort();
    Ok(lines.join("\n"))
}

/// Read a file inside the sandbox as UTF-8 text, capped at
/// `max_read_chars` characters with a truncation notice at the cap.
pub async fn get_file_content(context: &ToolContext, args: Value) -> Result<String, ToolError> {
    let args: ReadFileArgs = parse_args("get_file_content", args)?;

    let target = context
        .sandbox
        .resolve(&args.file_path)
        .map_err(|_| ToolError::OutsideSandbox {
            operation: "read",
            path: args.file_path.clone(),
        })?;

    if !target.is_file() {
        return Err(ToolError::NotARegularFile(args.file_path));
    }

    let full = tokio::fs::read_to_string(&target)
        .await
        .map_err(|source| ToolError::Read {
            path: args.file_path.clone(),
            source,
        })?;

    let cap = context.max_read_chars;
    let mut content: String = full.chars().take(cap).collect();
    if content.chars().count() == cap {
        content.push_str(&format!(
            "[...File \"{}\" truncated at {} characters]",
            args.file_path, cap
        ));
    }

    Ok(content)
}

/// Write content to a file inside the sandbox, overwriting in full.
pub async fn write_file(context: &ToolContext, args: Value) -> Result<String, ToolError> {
    let args: WriteFileArgs = parse_args("write_file", args)?;

    let target = context
        .sandbox
        .resolve(&args.file_path)
        .map_err(|_| ToolError::OutsideSandbox {
            operation: "write to",
            path: args.file_path.clone(),
        })?;

    // Parent directories are only created when the target itself is new.
    if !target.exists()
        && let Some(parent) = target.parent()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(ToolError::CreateDir)?;
    }

    if target.is_dir() {
        return Err(ToolError::IsADirectory(args.file_path));
    }

    let char_count = args.content.chars().count();
    tokio::fs::write(&target, &args.content)
        .await
        .map_err(|source| ToolError::Write {
            path: args.file_path.clone(),
            source,
        })?;

    Ok(format!(
        "Successfully wrote to \"{}\" ({} characters written)",
        args.file_path, char_count
    ))
}

/// Run a script file inside the sandbox with the configured interpreter,
/// a hard wall-clock timeout, and captured output.
pub async fn run_python_file(context: &ToolContext, args: Value) -> Result<String, ToolError> {
    let args: RunScriptArgs = parse_args("run_python_file", args)?;
    let language = &context.script_language;

    // Existence and extension are checked before containment.
    let target = context.sandbox.join(&args.file_path);

    if !target.is_file() {
        return Err(ToolError::ScriptNotFound(args.file_path));
    }

    let extension = target.extension().and_then(|ext| ext.to_str());
    if extension != Some(language.extension) {
        return Err(ToolError::NotAScript {
            path: args.file_path,
            language: language.name,
        });
    }

    if !context.sandbox.contains(&target) {
        return Err(ToolError::OutsideSandbox {
            operation: "execute",
            path: args.file_path,
        });
    }

    let output = tokio::time::timeout(
        context.script_timeout,
        Command::new(language.interpreter)
            .arg(&target)
            .current_dir(context.sandbox.root())
            .kill_on_drop(true)
            .output(),
    )
    .await;

    let output = match output {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => {
            return Err(ToolError::Exec {
                language: language.name,
                reason: source.to_string(),
            });
        }
        Err(_elapsed) => {
            return Err(ToolError::Exec {
                language: language.name,
                reason: format!(
                    "timed out after {} seconds",
                    context.script_timeout.as_secs()
                ),
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut sections = Vec::new();
    if !stdout.is_empty() {
        sections.push(format!("STDOUT:\n{stdout}"));
    }
    if !stderr.is_empty() {
        sections.push(format!("STDERR:\n{stderr}"));
    }
    if !output.status.success() {
        sections.push(format!(
            "Process exited with code {}",
            output.status.code().unwrap_or(-1)
        ));
    }

    if sections.is_empty() {
        Ok("No output produced.".to_string())
    } else {
        Ok(sections.join("\n"))
    }
}
