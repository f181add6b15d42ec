//! Agent event sinks.
//!
//! Adapters implement the `EventSink` port for different consumers:
//!
//! - `TracingEventSink` - Mirrors events into the `tracing` log
//! - `ChannelEventSink` - Ordered delivery over a tokio mpsc channel
//! - `RecordingEventSink` - In-memory capture for test assertions
//! - `JsonLinesEventSink` - One JSON object per line to any writer

mod channel;
mod json_lines;
mod recording;
mod tracing_sink;

pub use channel::ChannelEventSink;
pub use json_lines::JsonLinesEventSink;
pub use recording::RecordingEventSink;
pub use tracing_sink::TracingEventSink;
