use anyhow::{Context, Result, ensure};

use crate::constants::{SUMMARY_PROMPT, SYSTEM_PROMPT};
use crate::logging::{log_debug, log_error, log_info, log_warn};
use crate::provider::AiProvider;
use crate::tools::ToolExecutor;
use crate::tools::registry;
use crate::transcript::Transcript;

/// Per-run settings threaded through the loop; nothing here is ambient.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_iterations: usize,
    pub verbose: bool,
}

/// Drives the request / execute / append cycle against the gateway.
pub struct Agent {
    provider: Box<dyn AiProvider>,
    executor: ToolExecutor,
    config: AgentConfig,
    transcript: Transcript,
}

impl Agent {
    pub fn new(
        provider: Box<dyn AiProvider>,
        executor: ToolExecutor,
        config: AgentConfig,
        user_prompt: &str,
    ) -> Self {
        Self {
            provider,
            executor,
            config,
            transcript: Transcript::new(user_prompt),
        }
    }

    /// Run the loop until the model answers in plain text or the iteration
    /// budget runs out. Returns the final answer, or `None` when the
    /// budget was exhausted first (not an error).
    ///
    /// Gateway failures propagate and end the run.
    pub async fn run(&mut self) -> Result<Option<String>> {
        for iteration in 0..self.config.max_iterations {
            log_info(&format!(
                "Iteration {}/{}",
                iteration + 1,
                self.config.max_iterations
            ));

            let request = self
                .transcript
                .to_request(SYSTEM_PROMPT, registry::declarations());
            let turn = self
                .provider
                .request(request)
                .await
                .context("Chat request failed")?;

            log_debug(&format!(
                "Token usage: prompt={:?} completion={:?} total={:?}",
                turn.usage.prompt_tokens, turn.usage.completion_tokens, turn.usage.total_tokens
            ));
            if self.config.verbose {
                if let Some(prompt_tokens) = turn.usage.prompt_tokens {
                    println!("Prompt tokens: {prompt_tokens}");
                }
                if let Some(completion_tokens) = turn.usage.completion_tokens {
                    println!("Response tokens: {completion_tokens}");
                }
            }

            if turn.tool_calls.is_empty() {
                let text = turn.text.unwrap_or_default();
                self.transcript.push_assistant_text(&text);
                log_info("Model returned a final answer");
                return Ok(Some(text));
            }

            self.transcript.push_tool_calls(turn.tool_calls.clone());
            let responses = self.executor.execute_tool_calls(&turn.tool_calls).await;

            // One response per call, always. Anything else is a bug in the
            // executor, not a condition the model should see.
            ensure!(
                responses.len() == turn.tool_calls.len(),
                "tool execution produced {} response(s) for {} call(s)",
                responses.len(),
                turn.tool_calls.len()
            );

            for response in responses {
                self.transcript.push_tool_response(response);
            }
        }

        log_warn(&format!(
            "Reached the iteration limit ({}) without a final answer",
            self.config.max_iterations
        ));
        Ok(None)
    }

    /// One-shot trailing pass: ask the gateway to summarize the whole
    /// transcript. A gateway failure here degrades to a printed error
    /// instead of ending the process with a failure.
    pub async fn summarize(&mut self) -> Option<String> {
        self.transcript.push_user(SUMMARY_PROMPT);
        let request = self.transcript.to_request(SYSTEM_PROMPT, Vec::new());

        match self.provider.request(request).await {
            Ok(turn) => turn.text,
            Err(err) => {
                log_error(&format!("Summarization request failed: {err:#}"));
                eprintln!("Error: failed to summarize interaction: {err:#}");
                None
            }
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ModelTurn, TokenUsage};
    use crate::tools::implementations::ToolContext;
    use crate::tools::sandbox::Sandbox;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use genai::chat::{ChatRequest, ToolCall};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn tool_call(id: &str, name: &str) -> ToolCall {
        serde_json::from_value(json!({
            "call_id": id,
            "fn_name": name,
            "fn_arguments": {},
        }))
        .unwrap()
    }

    /// Gateway stub: issues `calls_per_turn` tool calls for the first
    /// `tool_turns` requests, then answers in text.
    #[derive(Debug)]
    struct StubProvider {
        requests: Arc<AtomicUsize>,
        tool_turns: usize,
        calls_per_turn: usize,
        fail: bool,
    }

    #[async_trait]
    impl AiProvider for StubProvider {
        async fn request(&mut self, _chat_request: ChatRequest) -> Result<ModelTurn> {
            if self.fail {
                return Err(anyhow!("gateway unavailable"));
            }
            let served = self.requests.fetch_add(1, Ordering::SeqCst);
            if served < self.tool_turns {
                let tool_calls = (0..self.calls_per_turn)
                    .map(|i| tool_call(&format!("call_{served}_{i}"), "get_files_info"))
                    .collect();
                Ok(ModelTurn {
                    text: None,
                    tool_calls,
                    usage: TokenUsage::default(),
                })
            } else {
                Ok(ModelTurn {
                    text: Some("all done".to_string()),
                    tool_calls: Vec::new(),
                    usage: TokenUsage::default(),
                })
            }
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }

        fn provider_name(&self) -> &'static str {
            "Stub"
        }
    }

    fn agent_with(
        tool_turns: usize,
        calls_per_turn: usize,
        max_iterations: usize,
    ) -> (TempDir, Arc<AtomicUsize>, Agent) {
        let temp_dir = TempDir::new().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let provider = Box::new(StubProvider {
            requests: Arc::clone(&requests),
            tool_turns,
            calls_per_turn,
            fail: false,
        });
        let executor = ToolExecutor::new(
            ToolContext::new(Sandbox::new(temp_dir.path()).unwrap()),
            false,
        );
        let config = AgentConfig {
            max_iterations,
            verbose: false,
        };
        let agent = Agent::new(provider, executor, config, "test prompt");
        (temp_dir, requests, agent)
    }

    #[tokio::test]
    async fn test_text_on_first_turn_finishes_the_loop() {
        let (_temp, requests, mut agent) = agent_with(0, 0, 15);

        let answer = agent.run().await.unwrap();
        assert_eq!(answer.as_deref(), Some("all done"));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
        // user prompt + assistant answer
        assert_eq!(agent.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_loop_stops_after_max_iterations() {
        // The stub never stops issuing tool calls.
        let (_temp, requests, mut agent) = agent_with(usize::MAX, 1, 3);

        let answer = agent.run().await.unwrap();
        assert_eq!(answer, None);
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_every_tool_call_gets_exactly_one_response() {
        let (_temp, _requests, mut agent) = agent_with(2, 3, 15);

        let answer = agent.run().await.unwrap();
        assert_eq!(answer.as_deref(), Some("all done"));
        // user + 2 * (tool-call message + 3 responses) + assistant answer
        assert_eq!(agent.transcript().len(), 1 + 2 * (1 + 3) + 1);
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_from_run() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Box::new(StubProvider {
            requests: Arc::new(AtomicUsize::new(0)),
            tool_turns: 0,
            calls_per_turn: 0,
            fail: true,
        });
        let executor = ToolExecutor::new(
            ToolContext::new(Sandbox::new(temp_dir.path()).unwrap()),
            false,
        );
        let config = AgentConfig {
            max_iterations: 15,
            verbose: false,
        };
        let mut agent = Agent::new(provider, executor, config, "prompt");

        assert!(agent.run().await.is_err());
    }

    #[tokio::test]
    async fn test_summarize_degrades_on_gateway_failure() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Box::new(StubProvider {
            requests: Arc::new(AtomicUsize::new(0)),
            tool_turns: 0,
            calls_per_turn: 0,
            fail: true,
        });
        let executor = ToolExecutor::new(
            ToolContext::new(Sandbox::new(temp_dir.path()).unwrap()),
            false,
        );
        let config = AgentConfig {
            max_iterations: 15,
            verbose: false,
        };
        let mut agent = Agent::new(provider, executor, config, "prompt");

        // No panic, no error: the failure is absorbed.
        assert_eq!(agent.summarize().await, None);
    }

    #[tokio::test]
    async fn test_summarize_returns_gateway_text() {
        let (_temp, _requests, mut agent) = agent_with(0, 0, 15);

        let summary = agent.summarize().await;
        assert_eq!(summary.as_deref(), Some("all done"));
    }
}
