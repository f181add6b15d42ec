//! Model Provider Adapters.
//!
//! Implementations of the ModelProvider port.
//!
//! ## Available Adapters
//!
//! - `MockModelProvider` - Scripted provider for tests and dry runs
//! - `AnthropicProvider` - Anthropic Messages API (block-native)
//! - `OpenAIProvider` - OpenAI Chat Completions API (flattened)
//! - `FailoverModelProvider` - One-shot failover to a secondary on rate limits

mod anthropic_provider;
mod failover_provider;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use failover_provider::FailoverModelProvider;
pub use mock_provider::{MockModelProvider, MockResponse, RecordedCall};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
