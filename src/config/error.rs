//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("No AI provider configured")]
    NoAiProviderConfigured,

    #[error("Fallback provider must differ from the primary provider")]
    FallbackSameAsPrimary,

    #[error("Unknown agent variant: {0}")]
    UnknownVariant(String),

    #[error("Confidence threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(u32),

    #[error("Maximum iterations must be greater than zero")]
    InvalidMaxIterations,

    #[error("Invalid agent variant: {0}")]
    InvalidVariant(String),

    #[error("Research fixtures file not found: {0}")]
    FixturesNotFound(String),
}
