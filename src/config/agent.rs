//! Agent run configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::agent::{AgentError, AgentVariant};
use crate::domain::foundation::Confidence;

/// Which preset to run and what to override on it
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Preset name: standard, thorough or deep_research
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Overrides the preset's acceptance threshold (0-100)
    pub min_confidence_threshold: Option<u32>,

    /// Overrides the preset's iteration budget
    pub max_iterations: Option<u32>,

    /// Overrides the preset's per-call output token limit
    pub max_tokens_per_call: Option<u32>,
}

impl AgentConfig {
    /// Resolves the preset and applies overrides.
    pub fn variant(&self) -> Result<AgentVariant, ValidationError> {
        let mut variant = AgentVariant::by_name(&self.variant).map_err(|e| match e {
            AgentError::UnknownVariant(name) => ValidationError::UnknownVariant(name),
            other => ValidationError::InvalidVariant(other.to_string()),
        })?;

        if let Some(threshold) = self.min_confidence_threshold {
            let confidence = Confidence::try_new(i64::from(threshold))
                .map_err(|_| ValidationError::InvalidThreshold(threshold))?;
            variant = variant.with_threshold(confidence);
        }

        if let Some(max_iterations) = self.max_iterations {
            if max_iterations == 0 {
                return Err(ValidationError::InvalidMaxIterations);
            }
            variant = variant.with_max_iterations(max_iterations);
        }

        if let Some(max_tokens) = self.max_tokens_per_call {
            variant = variant.with_max_tokens_per_call(max_tokens);
        }

        variant
            .validate()
            .map_err(|e| ValidationError::InvalidVariant(e.to_string()))?;

        Ok(variant)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.variant().map(|_| ())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            min_confidence_threshold: None,
            max_iterations: None,
            max_tokens_per_call: None,
        }
    }
}

fn default_variant() -> String {
    "standard".to_string()
}
