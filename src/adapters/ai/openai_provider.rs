//! OpenAI Provider - Implementation of ModelProvider for the Chat Completions API.
//!
//! OpenAI flattens what Anthropic keeps in blocks. Tool calls hang off the
//! assistant message as `tool_calls` with JSON-encoded argument strings, and
//! every tool result becomes its own `role: "tool"` message.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::domain::agent::{ContentBlock, Message, Role};
use crate::domain::tools::ToolDefinition;
use crate::ports::{
    CallOptions, ModelProvider, ModelResponse, ProviderError, ProviderInfo, StopReason, TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o", "gpt-4-turbo").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_request(
        &self,
        system: Option<&str>,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> OpenAIRequest {
        OpenAIRequest {
            model: self.config.model.clone(),
            messages: to_openai_messages(system, messages),
            max_tokens: Some(options.max_tokens),
            temperature: options.temperature,
            tools: tools.iter().map(ToolDefinition::to_openai_format).collect(),
        }
    }

    async fn send(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Calling OpenAI"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ProviderError::network(format!("Connection failed: {}", e))
                } else {
                    ProviderError::network(e.to_string())
                }
            })?;

        let response = handle_response_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ProviderError::parse(format!("Failed to parse response: {}", e)))
    }
}

/// Parses the API response status and handles errors.
async fn handle_response_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(status_to_error(status.as_u16(), &error_body))
}

fn status_to_error(status: u16, error_body: &str) -> ProviderError {
    match status {
        401 => ProviderError::AuthenticationFailed,
        429 => ProviderError::rate_limited(parse_retry_after(error_body)),
        400 => {
            if error_body.contains("maximum context length")
                || error_body.contains("context_length_exceeded")
            {
                ProviderError::ContextTooLong(error_body.to_string())
            } else {
                ProviderError::InvalidRequest(error_body.to_string())
            }
        }
        500..=599 => ProviderError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => ProviderError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Parses retry-after from an error body. Defaults to 30 seconds.
fn parse_retry_after(error_body: &str) -> u32 {
    let message = serde_json::from_str::<Value>(error_body).ok().and_then(|parsed| {
        parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    if let Some(msg) = message {
        if let Some(idx) = msg.find("try again in ") {
            let digits: String = msg[idx + 13..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(secs) = digits.parse::<u32>() {
                return secs;
            }
        }
    }
    30
}

/// Flattens the canonical transcript into role/content messages.
///
/// Tool results are emitted ahead of any text in the same user turn so
/// they directly follow the assistant message that requested them.
fn to_openai_messages(system: Option<&str>, messages: &[Message]) -> Vec<OpenAIMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);

    if let Some(system) = system {
        out.push(OpenAIMessage::text("system", system));
    }

    for message in messages {
        let blocks = message.blocks();
        let text = joined_text(&blocks);

        match message.role {
            Role::User => {
                for block in &blocks {
                    if let ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                    } = block
                    {
                        out.push(OpenAIMessage {
                            role: "tool",
                            content: Some(content.clone()),
                            tool_calls: Vec::new(),
                            tool_call_id: Some(tool_use_id.clone()),
                        });
                    }
                }
                if !text.is_empty() {
                    out.push(OpenAIMessage::text("user", text));
                }
            }
            Role::Assistant => {
                let tool_calls: Vec<OpenAIToolCall> = blocks
                    .iter()
                    .filter_map(ContentBlock::as_tool_use)
                    .map(|call| OpenAIToolCall {
                        id: call.id.to_string(),
                        call_type: "function".to_string(),
                        function: OpenAIFunctionCall {
                            name: call.name.to_string(),
                            arguments: Value::Object(call.input.clone()).to_string(),
                        },
                    })
                    .collect();

                out.push(OpenAIMessage {
                    role: "assistant",
                    content: (!text.is_empty()).then_some(text),
                    tool_calls,
                    tool_call_id: None,
                });
            }
        }
    }

    out
}

fn joined_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(ContentBlock::as_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed finish-reason table.
fn map_finish_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
        Some("length") => StopReason::MaxTokens,
        Some("stop") | Some("content_filter") => StopReason::EndTurn,
        _ => StopReason::EndTurn,
    }
}

/// Decodes a tool call's argument string.
///
/// Anything that is not a JSON object is preserved under `_raw` so schema
/// validation rejects it at dispatch instead of failing the run here.
fn parse_arguments(arguments: &str) -> Map<String, Value> {
    if arguments.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = Map::new();
            map.insert("_raw".to_string(), Value::String(arguments.to_string()));
            map
        }
    }
}

fn into_model_response(response: OpenAIResponse) -> Result<ModelResponse, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::parse("response contained no choices"))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
        content.push(ContentBlock::text(text));
    }
    for call in choice.message.tool_calls.unwrap_or_default() {
        content.push(ContentBlock::tool_use(
            call.id,
            call.function.name,
            parse_arguments(&call.function.arguments),
        ));
    }

    Ok(ModelResponse {
        content,
        stop_reason: map_finish_reason(choice.finish_reason.as_deref()),
        usage: response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        model: response.model,
    })
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    async fn call_model(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<ModelResponse, ProviderError> {
        let request = self.build_request(None, messages, tools, options);
        into_model_response(self.send(&request).await?)
    }

    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(Some(system_prompt), messages, &[], options);
        let response = into_model_response(self.send(&request).await?)?;
        Ok(response.texts().collect())
    }

    fn provider_info(&self) -> ProviderInfo {
        let max_context = match self.config.model.as_str() {
            m if m.starts_with("gpt-4o") || m.starts_with("gpt-4-turbo") => 128_000,
            m if m.starts_with("gpt-4.1") => 1_000_000,
            m if m.starts_with("gpt-4") => 8_192,
            m if m.starts_with("gpt-3.5") => 16_385,
            _ => 128_000,
        };

        ProviderInfo::new("openai", &self.config.model, max_context)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OpenAIToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn text(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: OpenAIFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4-turbo")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn provider_info_reports_context_window() {
        let provider =
            OpenAIProvider::new(OpenAIConfig::new("test").with_model("gpt-4o-mini")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4o-mini");
        assert_eq!(info.max_context_tokens, 128_000);
    }

    #[test]
    fn finish_reason_table() {
        assert_eq!(map_finish_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("content_filter")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("tool_calls")), StopReason::ToolUse);
        assert_eq!(map_finish_reason(Some("function_call")), StopReason::ToolUse);
        assert_eq!(map_finish_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("something_new")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
    }

    #[test]
    fn transcript_is_flattened() {
        let transcript = vec![
            Message::user("Find Jane"),
            Message::assistant_blocks(vec![
                ContentBlock::text("Searching two sources"),
                ContentBlock::tool_use("call_1", "search_person", input(json!({"name": "Jane"}))),
                ContentBlock::tool_use("call_2", "web_search", input(json!({"query": "Jane"}))),
            ]),
            Message::tool_results(vec![
                ContentBlock::tool_result("call_1", "{\"success\":true}"),
                ContentBlock::tool_result("call_2", "{\"success\":false}"),
            ]),
        ];

        let wire = serde_json::to_value(to_openai_messages(Some("sys"), &transcript)).unwrap();

        assert_eq!(
            wire,
            json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "Find Jane"},
                {"role": "assistant", "content": "Searching two sources", "tool_calls": [
                    {"id": "call_1", "type": "function",
                     "function": {"name": "search_person", "arguments": "{\"name\":\"Jane\"}"}},
                    {"id": "call_2", "type": "function",
                     "function": {"name": "web_search", "arguments": "{\"query\":\"Jane\"}"}}
                ]},
                {"role": "tool", "content": "{\"success\":true}", "tool_call_id": "call_1"},
                {"role": "tool", "content": "{\"success\":false}", "tool_call_id": "call_2"}
            ])
        );
    }

    #[test]
    fn assistant_without_text_sends_null_content() {
        let wire = to_openai_messages(
            None,
            &[Message::assistant_blocks(vec![ContentBlock::tool_use(
                "call_1",
                "verify_property",
                Map::new(),
            )])],
        );
        assert!(wire[0].content.is_none());
        assert_eq!(wire[0].tool_calls.len(), 1);
    }

    #[test]
    fn tool_calls_are_reassembled() {
        let raw = json!({
            "model": "gpt-4o",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "call_a", "type": "function",
                         "function": {"name": "calculate_distance",
                                      "arguments": "{\"origin\":\"A\",\"destination\":\"B\"}"}},
                        {"id": "call_b", "type": "function",
                         "function": {"name": "web_search", "arguments": "{not json"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 50, "completion_tokens": 12, "total_tokens": 62}
        });
        let response: OpenAIResponse = serde_json::from_value(raw).unwrap();

        let normalized = into_model_response(response).unwrap();

        assert_eq!(normalized.stop_reason, StopReason::ToolUse);
        assert_eq!(normalized.content.len(), 2);
        let first = normalized.content[0].as_tool_use().unwrap();
        assert_eq!(first.id, "call_a");
        assert_eq!(first.input["destination"], json!("B"));
        let second = normalized.content[1].as_tool_use().unwrap();
        assert_eq!(second.input["_raw"], json!("{not json"));
        assert_eq!(normalized.usage, Some(TokenUsage::new(50, 12)));
    }

    #[test]
    fn non_object_arguments_are_preserved_raw() {
        assert_eq!(parse_arguments("[1,2]")["_raw"], json!("[1,2]"));
        assert!(parse_arguments("").is_empty());
    }

    #[test]
    fn empty_choices_is_a_parse_error() {
        let response: OpenAIResponse =
            serde_json::from_value(json!({"model": "gpt-4o", "choices": []})).unwrap();
        assert!(matches!(
            into_model_response(response),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_to_error(401, ""), ProviderError::AuthenticationFailed);
        assert_eq!(status_to_error(429, ""), ProviderError::rate_limited(30));
        assert!(matches!(
            status_to_error(400, r#"{"error":{"code":"context_length_exceeded"}}"#),
            ProviderError::ContextTooLong(_)
        ));
        assert!(matches!(status_to_error(502, ""), ProviderError::Unavailable { .. }));
        assert!(matches!(status_to_error(418, ""), ProviderError::Network(_)));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit reached. Please try again in 20s."}}"#;
        assert_eq!(parse_retry_after(body), 20);
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(parse_retry_after(r#"{"error":{"message":"Rate limit exceeded"}}"#), 30);
    }
}
