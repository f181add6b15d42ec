//! Application layer - use cases that drive the domain through ports.
//!
//! - [`AgentOrchestrator`] - the research loop
//! - [`ToolDispatcher`] - routes tool calls to capability backends

mod dispatcher;
mod orchestrator;

pub use dispatcher::{DispatchOutcome, ToolDispatcher};
pub use orchestrator::AgentOrchestrator;
