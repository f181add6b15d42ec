//! Agent module - the vocabulary of a research run.
//!
//! Everything here is pure: messages, decisions, the confidence gate, the
//! event model, run states and variant configuration. The loop that drives
//! them against real ports lives in `application::orchestrator`.

mod decision;
mod errors;
mod events;
mod gate;
mod message;
pub mod prompts;
mod replay;
mod result;
mod state;
mod variant;

pub use decision::{AddressInfo, AgentDecision, Recommendation};
pub use errors::AgentError;
pub use events::{AgentEvent, AgentEventKind, AgentEventType};
pub use gate::{ConfidenceGate, GateVerdict};
pub use message::{ContentBlock, Message, MessageContent, Role, ToolUse, Transcript};
pub use replay::{ReplayError, RunReplay};
pub use result::{AgentResult, RunStatus};
pub use state::RunPhase;
pub use variant::AgentVariant;
