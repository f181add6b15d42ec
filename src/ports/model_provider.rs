//! Model Provider Port - Interface for language model integrations.
//!
//! Adapters translate the canonical transcript ([`Message`] /
//! [`ContentBlock`]) into each vendor's wire format and normalize the reply
//! back into a [`ModelResponse`].
//!
//! # Example
//!
//! ```ignore
//! let response = provider
//!     .call_model(transcript.messages(), registry.definitions(), &options)
//!     .await?;
//!
//! match response.stop_reason {
//!     StopReason::ToolUse => { /* dispatch tool calls */ }
//!     StopReason::EndTurn => { /* nudge */ }
//!     StopReason::MaxTokens => { /* abort */ }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::sync::Arc;

use crate::domain::agent::{ContentBlock, Message};
use crate::domain::tools::ToolDefinition;

/// Port for language model calls.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// One agent turn: the transcript plus available tools in, normalized
    /// content and stop reason out.
    async fn call_model(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<ModelResponse, ProviderError>;

    /// One-shot completion without tools.
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<String, ProviderError>;

    /// Provider name and model in use.
    fn provider_info(&self) -> ProviderInfo;

    /// Fresh instance for one run, for providers that keep run-scoped state.
    ///
    /// `None` means the provider is stateless and can be shared as is.
    fn for_run(&self) -> Option<Arc<dyn ModelProvider>> {
        None
    }
}

/// Resolves the provider a single run should talk to.
pub fn provider_for_run(provider: &Arc<dyn ModelProvider>) -> Arc<dyn ModelProvider> {
    provider.for_run().unwrap_or_else(|| Arc::clone(provider))
}

/// Per-call generation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallOptions {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl CallOptions {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Default for CallOptions {
    fn default() -> Self {
        Self::new(4096)
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Finished its turn.
    EndTurn,
    /// Wants tool calls answered.
    ToolUse,
    /// Output was truncated.
    MaxTokens,
}

/// Normalized reply to [`ModelProvider::call_model`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: StopReason,
    pub usage: Option<TokenUsage>,
    pub model: String,
}

impl ModelResponse {
    /// Text blocks, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(ContentBlock::as_text)
    }

    pub fn has_tool_uses(&self) -> bool {
        self.content.iter().any(|b| b.as_tool_use().is_some())
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai", "anthropic").
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// Maximum context window size in tokens.
    pub max_context_tokens: u32,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context_tokens: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens,
        }
    }
}

/// Model provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Context (prompt + history) exceeds model limit.
    #[error("context too long: {0}")]
    ContextTooLong(String),

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request rejected as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

/// Substrings that identify a rate limit or capacity rejection in free text.
const RATE_LIMIT_SIGNATURES: &[&str] = &[
    "status 429",
    "http 429",
    "error 429",
    "rate limit",
    "rate_limit",
    "ratelimit",
    "too many requests",
    "overloaded",
    "quota",
];

impl ProviderError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True for rate limits, whether typed or only visible in the message.
    ///
    /// Providers sometimes report capacity problems as a generic 5xx whose
    /// body says "overloaded" or "quota"; those count too. Errors with a
    /// known non-capacity cause never match on text.
    pub fn is_rate_limit(&self) -> bool {
        let message = match self {
            ProviderError::RateLimited { .. } => return true,
            ProviderError::ContextTooLong(_)
            | ProviderError::Timeout { .. }
            | ProviderError::AuthenticationFailed => return false,
            ProviderError::Unavailable { message } => message,
            ProviderError::Network(message)
            | ProviderError::Parse(message)
            | ProviderError::InvalidRequest(message) => message,
        };
        let message = message.to_lowercase();
        RATE_LIMIT_SIGNATURES.iter().any(|sig| message.contains(sig))
    }
}
