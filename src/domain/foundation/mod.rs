//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers and error types used across the agent and
//! tool modules.

mod confidence;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use confidence::Confidence;
pub use errors::ValidationError;
pub use ids::RunId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
