//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the agent to external systems:
//! - `ai` - Model providers (Anthropic, OpenAI, failover, scripted mock)
//! - `events` - Event sinks (tracing, channel, recording, JSON lines)
//! - `research` - Capability backends
//! - `cancellation` - Shared cancellation flag

pub mod ai;
mod cancellation;
pub mod events;
pub mod research;

pub use ai::{
    AnthropicConfig, AnthropicProvider, FailoverModelProvider, MockModelProvider, OpenAIConfig,
    OpenAIProvider,
};
pub use cancellation::CancellationFlag;
pub use events::{ChannelEventSink, JsonLinesEventSink, RecordingEventSink, TracingEventSink};
pub use research::StaticResearch;
