//! Scripted model provider for tests and dry runs.
//!
//! Responses are queued up front and consumed one per call. When the queue
//! runs dry the provider keeps answering with a plain end-of-turn text, which
//! makes the orchestrator nudge until its budget is spent.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockModelProvider::new()
//!     .with_tool_call("web_search", json!({"query": "Acme HQ"}))
//!     .with_tool_call("submit_decision", json!({
//!         "recommendation": "OFFICE", "confidence": 85, "reasoning": "HQ"
//!     }));
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::agent::{ContentBlock, Message};
use crate::domain::tools::ToolDefinition;
use crate::ports::{
    CallOptions, ModelProvider, ModelResponse, ProviderError, ProviderInfo, StopReason, TokenUsage,
};

/// Usage reported for every scripted turn.
const MOCK_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 10,
    completion_tokens: 5,
    total_tokens: 15,
};

/// A queued reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Turn(ModelResponse),
    Error(ProviderError),
}

/// What the provider was called with.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
    pub options: CallOptions,
}

#[derive(Debug, Clone)]
pub struct MockModelProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    info: ProviderInfo,
    delay: Duration,
    next_tool_id: usize,
}

impl Default for MockModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModelProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 200_000),
            delay: Duration::ZERO,
            next_tool_id: 1,
        }
    }

    /// Queues an end-of-turn text reply with no tool calls.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(ModelResponse {
            content: vec![ContentBlock::text(text)],
            stop_reason: StopReason::EndTurn,
            usage: Some(MOCK_USAGE),
            model: "mock-model-1".to_string(),
        })
    }

    /// Queues a turn proposing one tool call.
    pub fn with_tool_call(self, name: &str, input: Value) -> Self {
        self.with_tool_calls(vec![(name, input)])
    }

    /// Queues a turn proposing several tool calls, in order.
    pub fn with_tool_calls(self, calls: Vec<(&str, Value)>) -> Self {
        self.with_thinking_and_tool_calls(None, calls)
    }

    /// Queues a turn with leading text followed by tool calls.
    pub fn with_thinking_and_tool_calls(
        mut self,
        thinking: Option<&str>,
        calls: Vec<(&str, Value)>,
    ) -> Self {
        let mut content = Vec::new();
        if let Some(text) = thinking {
            content.push(ContentBlock::text(text));
        }
        for (name, input) in calls {
            let id = format!("toolu_mock_{:03}", self.next_tool_id);
            self.next_tool_id += 1;
            content.push(ContentBlock::tool_use(id, name, as_object(input)));
        }
        self.with_response(ModelResponse {
            content,
            stop_reason: StopReason::ToolUse,
            usage: Some(MOCK_USAGE),
            model: "mock-model-1".to_string(),
        })
    }

    /// Queues a reply cut off by the token limit.
    pub fn with_truncated(self, partial_text: impl Into<String>) -> Self {
        self.with_response(ModelResponse {
            content: vec![ContentBlock::text(partial_text)],
            stop_reason: StopReason::MaxTokens,
            usage: Some(MOCK_USAGE),
            model: "mock-model-1".to_string(),
        })
    }

    pub fn with_response(self, response: ModelResponse) -> Self {
        self.queue().push_back(MockResponse::Turn(response));
        self
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        self.queue().push_back(MockResponse::Error(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded().clone()
    }

    /// Responses still queued.
    pub fn remaining(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<MockResponse>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_response(&self) -> MockResponse {
        self.queue().pop_front().unwrap_or_else(|| {
            MockResponse::Turn(ModelResponse {
                content: vec![ContentBlock::text("Mock response")],
                stop_reason: StopReason::EndTurn,
                usage: Some(MOCK_USAGE),
                model: "mock-model-1".to_string(),
            })
        })
    }

    async fn respond(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<ModelResponse, ProviderError> {
        self.recorded().push(RecordedCall {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name().to_string()).collect(),
            options: *options,
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Turn(response) => Ok(response),
            MockResponse::Error(err) => Err(err),
        }
    }
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("_raw".to_string(), other);
            map
        }
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn call_model(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<ModelResponse, ProviderError> {
        self.respond(messages, tools, options).await
    }

    async fn chat(
        &self,
        _system_prompt: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        let response = self.respond(messages, &[], options).await?;
        Ok(response.texts().collect())
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_queue_in_order_then_defaults() {
        let provider = MockModelProvider::new()
            .with_tool_call("web_search", json!({"query": "x"}))
            .with_error(ProviderError::rate_limited(5));

        let first = provider
            .call_model(&[], &[], &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(first.stop_reason, StopReason::ToolUse);

        let second = provider.call_model(&[], &[], &CallOptions::default()).await;
        assert_eq!(second.unwrap_err(), ProviderError::rate_limited(5));

        let third = provider
            .call_model(&[], &[], &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(third.stop_reason, StopReason::EndTurn);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn tool_ids_are_unique_across_turns() {
        let provider = MockModelProvider::new()
            .with_tool_calls(vec![("a", json!({})), ("b", json!({}))])
            .with_tool_call("c", json!({}));

        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = provider
                .call_model(&[], &[], &CallOptions::default())
                .await
                .unwrap();
            ids.extend(response.content.iter().filter_map(|b| b.as_tool_use().map(|t| t.id.to_string())));
        }
        assert_eq!(ids, vec!["toolu_mock_001", "toolu_mock_002", "toolu_mock_003"]);
    }

    #[tokio::test]
    async fn records_messages_and_tools() {
        let provider = MockModelProvider::new();
        let tool = ToolDefinition::new("web_search", "search", json!({"type": "object"}));
        provider
            .call_model(&[Message::user("hi")], &[tool], &CallOptions::new(512))
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].messages, vec![Message::user("hi")]);
        assert_eq!(calls[0].tool_names, vec!["web_search"]);
        assert_eq!(calls[0].options.max_tokens, 512);
    }

    #[tokio::test]
    async fn chat_returns_text() {
        let provider = MockModelProvider::new().with_text("summary");
        let text = provider
            .chat("be brief", &[Message::user("hi")], &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "summary");
    }
}
