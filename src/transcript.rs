use genai::chat::{ChatMessage, ChatRequest, Tool, ToolCall, ToolResponse};

/// Append-only conversation history, replayed in full to the gateway on
/// every request.
///
/// Entries are never removed or rewritten once appended. The agent loop
/// keeps the pairing invariant: every tool-call message is followed by one
/// tool response per call before the next model request is built.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// A transcript starts with exactly the user's prompt.
    pub fn new(user_prompt: &str) -> Self {
        Self {
            messages: vec![ChatMessage::user(user_prompt)],
        }
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_assistant_text(&mut self, text: &str) {
        self.messages.push(ChatMessage::assistant(text));
    }

    pub fn push_tool_calls(&mut self, tool_calls: Vec<ToolCall>) {
        self.messages.push(ChatMessage::from(tool_calls));
    }

    pub fn push_tool_response(&mut self, response: ToolResponse) {
        self.messages.push(ChatMessage::from(response));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Build the request for the next model turn: the whole history plus
    /// the system prompt and the advertised tool declarations.
    pub fn to_request(&self, system: &str, tools: Vec<Tool>) -> ChatRequest {
        let request = ChatRequest::new(self.messages.clone()).with_system(system);
        if tools.is_empty() {
            request
        } else {
            request.with_tools(tools)
        }
    }
}
