//! Anthropic Provider - Implementation of ModelProvider for Anthropic's Messages API.
//!
//! Anthropic is block-native: the canonical [`ContentBlock`]s go over the
//! wire almost unchanged, tool results ride inline in user messages, and
//! consecutive messages from the same speaker must be merged.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_timeout(Duration::from_secs(90));
//!
//! let provider = AnthropicProvider::new(config)?;
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

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
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

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn build_request(
        &self,
        system: Option<&str>,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<AnthropicRequest, ProviderError> {
        let messages = to_anthropic_messages(messages);
        if messages.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "cannot call the model with an empty transcript".to_string(),
            ));
        }

        Ok(AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system: system.map(str::to_string),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            tools: tools.iter().map(ToolDefinition::to_anthropic_format).collect(),
        })
    }

    /// Sends a request and returns the decoded reply.
    async fn send(&self, request: &AnthropicRequest) -> Result<AnthropicResponse, ProviderError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Calling Anthropic"
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
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

/// Maps a failed HTTP status and body onto a provider error.
fn status_to_error(status: u16, error_body: &str) -> ProviderError {
    match status {
        401 => ProviderError::AuthenticationFailed,
        429 => ProviderError::rate_limited(parse_retry_after(error_body)),
        400 => {
            if error_body.contains("prompt is too long") || error_body.contains("too many tokens") {
                ProviderError::ContextTooLong(error_body.to_string())
            } else {
                ProviderError::InvalidRequest(error_body.to_string())
            }
        }
        // Anthropic-specific "overloaded"
        529 => ProviderError::unavailable(format!("Server error 529 overloaded: {}", error_body)),
        500..=599 => ProviderError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => ProviderError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Parses retry-after from an error body.
fn parse_retry_after(error_body: &str) -> u32 {
    if let Ok(parsed) = serde_json::from_str::<Value>(error_body) {
        if let Some(msg) = parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            if let Some(idx) = msg.find("try again in ") {
                let rest = &msg[idx + 13..];
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                if let Ok(secs) = digits.parse::<u32>() {
                    return secs;
                }
            }
        }
    }
    60
}

/// Translates the canonical transcript, merging consecutive same-role turns.
fn to_anthropic_messages(messages: &[Message]) -> Vec<AnthropicMessage> {
    let mut merged: Vec<AnthropicMessage> = Vec::with_capacity(messages.len());

    for message in messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        let blocks = message.blocks();

        match merged.last_mut() {
            Some(last) if last.role == role => last.content.extend(blocks),
            _ => merged.push(AnthropicMessage {
                role,
                content: blocks,
            }),
        }
    }

    merged
}

/// Fixed stop-reason table.
fn map_stop_reason(stop_reason: Option<&str>) -> StopReason {
    match stop_reason {
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        Some("end_turn") | Some("stop_sequence") => StopReason::EndTurn,
        _ => StopReason::EndTurn,
    }
}

/// Normalizes reply blocks. Block types we do not model are dropped.
fn from_anthropic_content(blocks: Vec<AnthropicContent>) -> Vec<ContentBlock> {
    blocks
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContent::Text { text } => Some(ContentBlock::text(text)),
            AnthropicContent::ToolUse { id, name, input } => {
                Some(ContentBlock::tool_use(id, name, into_object(input)))
            }
            AnthropicContent::Other => None,
        })
        .collect()
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("_raw".to_string(), other);
            map
        }
    }
}

fn into_model_response(response: AnthropicResponse) -> ModelResponse {
    ModelResponse {
        stop_reason: map_stop_reason(response.stop_reason.as_deref()),
        content: from_anthropic_content(response.content),
        usage: response
            .usage
            .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens)),
        model: response.model,
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    async fn call_model(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<ModelResponse, ProviderError> {
        let request = self.build_request(None, messages, tools, options)?;
        let response = self.send(&request).await?;
        Ok(into_model_response(response))
    }

    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(Some(system_prompt), messages, &[], options)?;
        let response = into_model_response(self.send(&request).await?);
        Ok(response.texts().collect())
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model, 200_000)
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
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
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-opus-20240229")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_debug_hides_api_key() {
        let config = AnthropicConfig::new("sk-ant-secret");
        assert!(!format!("{:?}", config).contains("sk-ant-secret"));
    }

    #[test]
    fn stop_reason_table() {
        assert_eq!(map_stop_reason(Some("end_turn")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(Some("stop_sequence")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(Some("tool_use")), StopReason::ToolUse);
        assert_eq!(map_stop_reason(Some("max_tokens")), StopReason::MaxTokens);
        assert_eq!(map_stop_reason(Some("pause_turn")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(None), StopReason::EndTurn);
    }

    #[test]
    fn consecutive_user_messages_are_merged() {
        let transcript = vec![
            Message::user("Find the address"),
            Message::assistant_blocks(vec![ContentBlock::tool_use(
                "toolu_1",
                "web_search",
                input(json!({"query": "Jane Doe"})),
            )]),
            Message::tool_results(vec![ContentBlock::tool_result("toolu_1", "{}")]),
            Message::user("Keep going"),
        ];

        let wire = to_anthropic_messages(&transcript);

        assert_eq!(wire.len(), 3);
        assert_eq!(wire[2].role, "user");
        assert_eq!(wire[2].content.len(), 2);
        assert_eq!(wire[2].content[1].as_text(), Some("Keep going"));
    }

    #[test]
    fn tool_blocks_serialize_in_native_shape() {
        let wire = to_anthropic_messages(&[
            Message::assistant_blocks(vec![
                ContentBlock::text("Looking up"),
                ContentBlock::tool_use("toolu_9", "verify_property", input(json!({"address": "1 Main"}))),
            ]),
            Message::tool_results(vec![ContentBlock::tool_result("toolu_9", "ok")]),
        ]);

        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            value,
            json!([
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Looking up"},
                    {"type": "tool_use", "id": "toolu_9", "name": "verify_property",
                     "input": {"address": "1 Main"}}
                ]},
                {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "toolu_9", "content": "ok"}
                ]}
            ])
        );
    }

    #[test]
    fn response_blocks_are_normalized() {
        let raw = json!({
            "model": "claude-sonnet-4-20250514",
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "Submitting."},
                {"type": "tool_use", "id": "toolu_7", "name": "submit_decision",
                 "input": {"recommendation": "HOME", "confidence": 80, "reasoning": "r"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 120, "output_tokens": 30}
        });
        let response: AnthropicResponse = serde_json::from_value(raw).unwrap();

        let normalized = into_model_response(response);

        assert_eq!(normalized.stop_reason, StopReason::ToolUse);
        assert_eq!(normalized.content.len(), 2);
        let call = normalized.content[1].as_tool_use().unwrap();
        assert_eq!(call.id, "toolu_7");
        assert_eq!(call.name, "submit_decision");
        assert_eq!(call.input["confidence"], json!(80));
        assert_eq!(normalized.usage, Some(TokenUsage::new(120, 30)));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_to_error(401, ""), ProviderError::AuthenticationFailed);
        assert_eq!(status_to_error(429, ""), ProviderError::rate_limited(60));
        assert!(matches!(
            status_to_error(400, "prompt is too long: 210000 tokens"),
            ProviderError::ContextTooLong(_)
        ));
        assert!(matches!(status_to_error(400, "bad"), ProviderError::InvalidRequest(_)));
        assert!(matches!(status_to_error(503, ""), ProviderError::Unavailable { .. }));
    }

    #[test]
    fn overloaded_counts_as_rate_limit() {
        let err = status_to_error(529, r#"{"type":"error","error":{"type":"overloaded_error"}}"#);
        assert!(matches!(err, ProviderError::Unavailable { .. }));
        assert!(err.is_rate_limit());
    }

    #[test]
    fn parse_retry_after_reads_message() {
        let body = r#"{"error":{"message":"Rate limited, try again in 12s"}}"#;
        assert_eq!(parse_retry_after(body), 12);
        assert_eq!(parse_retry_after(r#"{"error":{"message":"Rate limit exceeded"}}"#), 60);
    }

    #[test]
    fn empty_transcript_is_rejected() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("k")).unwrap();
        let err = provider
            .build_request(None, &[], &[], &CallOptions::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn tools_use_anthropic_shape() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("k")).unwrap();
        let tool = ToolDefinition::new("web_search", "Search", json!({"type": "object"}));
        let request = provider
            .build_request(Some("sys"), &[Message::user("hi")], &[tool], &CallOptions::new(256))
            .unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"][0]["input_schema"], json!({"type": "object"}));
        assert_eq!(value["system"], "sys");
        assert_eq!(value["max_tokens"], 256);
        assert!(value.get("temperature").is_none());
    }
}
