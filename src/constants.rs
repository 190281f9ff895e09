/// Default model constants
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Get default model from environment variable or default
pub fn get_default_model() -> String {
    std::env::var("GEMCODE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
}

/// Sandbox defaults
pub const DEFAULT_WORKING_DIR: &str = "calculator";
pub const MAX_READ_CHARS: usize = 10_000;
pub const SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Agent loop iteration budget
pub const MAX_ITERATIONS: usize = 15;

/// API key validation constants
pub const API_KEY_LENGTH: usize = 39;
pub const API_KEY_PREFIX: &str = "AIza";

/// URLs for user guidance
pub const GEMINI_API_KEY_URL: &str = "https://makersuite.google.com/app/apikey";
pub const GEMINI_DOCS_URL: &str = "https://ai.google.dev/gemini-api/docs/api-key";

/// System prompt sent with every request of a run.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. You can perform the following operations:

- List files and directories
- Read file contents
- Write or overwrite files
- Run Python files

All paths you provide should be relative to the working directory. You do not need to specify the working directory in your function calls as it is automatically injected for security reasons.
";

/// Instruction for the one-shot summarization pass after the loop ends.
pub const SUMMARY_PROMPT: &str = "Please summarize this interaction: what was asked, \
which function calls were made, and what the outcome was.";
