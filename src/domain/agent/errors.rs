//! Agent construction errors.

use thiserror::Error;

/// Raised before a run starts; a started run never returns an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("invalid agent configuration: {0}")]
    Configuration(String),

    #[error("unknown agent variant: {0}")]
    UnknownVariant(String),
}

impl AgentError {
    pub fn configuration(message: impl Into<String>) -> Self {
        AgentError::Configuration(message.into())
    }
}
