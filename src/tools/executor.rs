use genai::chat::{ToolCall, ToolResponse};

use crate::logging::{log_debug, log_error, log_info};

use super::implementations::ToolContext;
use super::registry::ToolKind;

/// Executes model-issued tool calls against the fixed per-run context.
///
/// Every call produces exactly one response. Failures are folded into the
/// response payload as `Error: ...` strings so the model can see them and
/// adjust its plan; nothing a tool does can fail the loop.
pub struct ToolExecutor {
    context: ToolContext,
    verbose: bool,
}

impl ToolExecutor {
    pub fn new(context: ToolContext, verbose: bool) -> Self {
        Self { context, verbose }
    }

    /// Execute a single tool call and wrap the outcome as a response.
    pub async fn execute_tool_call(&self, tool_call: &ToolCall) -> ToolResponse {
        if self.verbose {
            println!(
                "Calling function: {}({})",
                tool_call.fn_name, tool_call.fn_arguments
            );
        } else {
            println!(" - Calling function: {}", tool_call.fn_name);
        }
        log_info(&format!(
            "Executing tool: {} (call_id: {})",
            tool_call.fn_name, tool_call.call_id
        ));
        log_debug(&format!("Tool arguments: {:?}", tool_call.fn_arguments));

        let result = match ToolKind::from_name(&tool_call.fn_name) {
            Some(kind) => match kind
                .execute(&self.context, tool_call.fn_arguments.clone())
                .await
            {
                Ok(output) => {
                    log_info(&format!(
                        "Tool {} succeeded, output length: {}",
                        tool_call.fn_name,
                        output.len()
                    ));
                    output
                }
                Err(err) => {
                    log_error(&format!("Tool {} failed: {}", tool_call.fn_name, err));
                    format!("Error: {err}")
                }
            },
            None => {
                log_error(&format!("Unknown tool requested: {}", tool_call.fn_name));
                format!("Error: Unknown function: {}", tool_call.fn_name)
            }
        };

        if self.verbose {
            println!("-> {result}");
        }

        ToolResponse::new(tool_call.call_id.clone(), result)
    }

    /// Execute tool calls one at a time, in the order the model issued
    /// them. Returns exactly one response per call.
    pub async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolResponse> {
        log_info(&format!("Executing {} tool call(s)", tool_calls.len()));

        let mut responses = Vec::with_capacity(tool_calls.len());
        for tool_call in tool_calls {
            responses.push(self.execute_tool_call(tool_call).await);
        }
        responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::sandbox::Sandbox;
    use serde_json::json;
    use tempfile::TempDir;

    fn executor() -> (TempDir, ToolExecutor) {
        let temp_dir = TempDir::new().unwrap();
        let context = ToolContext::new(Sandbox::new(temp_dir.path()).unwrap());
        (temp_dir, ToolExecutor::new(context, false))
    }

    fn tool_call(name: &str, args: serde_json::Value) -> ToolCall {
        serde_json::from_value(json!({
            "call_id": "call_1",
            "fn_name": name,
            "fn_arguments": args,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_function_becomes_error_response() {
        let (_temp, executor) = executor();
        let call = tool_call("delete_everything", json!({}));

        let response = executor.execute_tool_call(&call).await;
        assert_eq!(response.content, "Error: Unknown function: delete_everything");
    }

    #[tokio::test]
    async fn test_tool_error_becomes_error_payload() {
        let (_temp, executor) = executor();
        let call = tool_call("get_file_content", json!({"file_path": "missing.txt"}));

        let response = executor.execute_tool_call(&call).await;
        assert_eq!(
            response.content,
            "Error: File not found or is not a regular file: \"missing.txt\""
        );
    }

    #[tokio::test]
    async fn test_successful_call_returns_payload() {
        let (_temp, executor) = executor();
        std::fs::write(executor.context.sandbox.root().join("x.txt"), "content").unwrap();
        let call = tool_call("get_file_content", json!({"file_path": "x.txt"}));

        let response = executor.execute_tool_call(&call).await;
        assert_eq!(response.content, "content");
    }

    #[tokio::test]
    async fn test_one_response_per_call_in_order() {
        let (_temp, executor) = executor();
        std::fs::write(executor.context.sandbox.root().join("a.txt"), "A").unwrap();
        let calls = vec![
            tool_call("get_file_content", json!({"file_path": "a.txt"})),
            tool_call("bogus", json!({})),
            tool_call("get_files_info", json!({})),
        ];

        let responses = executor.execute_tool_calls(&calls).await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].content, "A");
        assert!(responses[1].content.starts_with("Error: Unknown function"));
    }
}
