//! Agent variants: named bundles of run configuration.
//!
//! Variants never change the loop itself, only its budgets, gate threshold,
//! toolset and instruction text.

use serde::{Deserialize, Serialize};

use super::prompts::{render_instruction, DEEP_RESEARCH_INSTRUCTION, STANDARD_INSTRUCTION};
use super::{AgentError, ConfidenceGate};
use crate::domain::foundation::Confidence;
use crate::domain::tools::Toolset;

const DEFAULT_THRESHOLD: u8 = 75;
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Run-scoped configuration for one orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentVariant {
    pub name: String,
    pub max_iterations: u32,
    pub max_tokens_per_call: u32,
    pub temperature: f32,
    pub min_confidence_threshold: Confidence,
    pub toolset: Toolset,
    pub instruction_template: String,
}

impl AgentVariant {
    /// 15 turns over the base toolset.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            max_iterations: 15,
            max_tokens_per_call: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            min_confidence_threshold: Confidence::saturating(DEFAULT_THRESHOLD),
            toolset: Toolset::Base,
            instruction_template: STANDARD_INSTRUCTION.to_string(),
        }
    }

    /// 20 turns over the base toolset.
    pub fn thorough() -> Self {
        Self {
            name: "thorough".to_string(),
            max_iterations: 20,
            ..Self::standard()
        }
    }

    /// 30 turns with the experimental record and geography tools.
    pub fn deep_research() -> Self {
        Self {
            name: "deep_research".to_string(),
            max_iterations: 30,
            toolset: Toolset::Extended,
            instruction_template: DEEP_RESEARCH_INSTRUCTION.to_string(),
            ..Self::standard()
        }
    }

    /// Looks up a preset by name.
    pub fn by_name(name: &str) -> Result<Self, AgentError> {
        match name {
            "standard" => Ok(Self::standard()),
            "thorough" => Ok(Self::thorough()),
            "deep_research" | "deep-research" => Ok(Self::deep_research()),
            other => Err(AgentError::UnknownVariant(other.to_string())),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_threshold(mut self, threshold: Confidence) -> Self {
        self.min_confidence_threshold = threshold;
        self
    }

    pub fn with_max_tokens_per_call(mut self, max_tokens: u32) -> Self {
        self.max_tokens_per_call = max_tokens;
        self
    }

    pub fn with_toolset(mut self, toolset: Toolset) -> Self {
        self.toolset = toolset;
        self
    }

    pub fn with_instruction_template(mut self, template: impl Into<String>) -> Self {
        self.instruction_template = template.into();
        self
    }

    pub fn gate(&self) -> ConfidenceGate {
        ConfidenceGate::new(self.min_confidence_threshold)
    }

    /// First transcript message for `input`.
    pub fn instruction_for(&self, input: &str) -> String {
        render_instruction(
            &self.instruction_template,
            input,
            self.min_confidence_threshold.value(),
            self.max_iterations,
        )
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.max_iterations == 0 {
            return Err(AgentError::configuration("max_iterations must be at least 1"));
        }
        if self.max_tokens_per_call == 0 {
            return Err(AgentError::configuration(
                "max_tokens_per_call must be at least 1",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AgentError::configuration(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        if !self.instruction_template.contains("{input}") {
            return Err(AgentError::configuration(
                "instruction_template must contain an {input} placeholder",
            ));
        }
        Ok(())
    }
}

impl Default for AgentVariant {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_share_threshold_and_differ_in_budget() {
        let standard = AgentVariant::standard();
        let thorough = AgentVariant::thorough();
        let deep = AgentVariant::deep_research();

        assert_eq!(standard.max_iterations, 15);
        assert_eq!(thorough.max_iterations, 20);
        assert_eq!(deep.max_iterations, 30);
        for v in [&standard, &thorough, &deep] {
            assert_eq!(v.min_confidence_threshold.value(), 75);
            assert_eq!(v.max_tokens_per_call, 4096);
            assert!(v.validate().is_ok());
        }
        assert_eq!(deep.toolset, Toolset::Extended);
        assert_eq!(standard.toolset, Toolset::Base);
    }

    #[test]
    fn by_name_resolves_presets() {
        assert_eq!(AgentVariant::by_name("thorough").unwrap().name, "thorough");
        assert_eq!(AgentVariant::by_name("deep-research").unwrap().name, "deep_research");
        assert_eq!(
            AgentVariant::by_name("turbo"),
            Err(AgentError::UnknownVariant("turbo".to_string()))
        );
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let variant = AgentVariant::standard().with_max_iterations(0);
        assert!(matches!(variant.validate(), Err(AgentError::Configuration(_))));
    }

    #[test]
    fn validate_rejects_template_without_input() {
        let variant = AgentVariant::standard().with_instruction_template("Do research.");
        assert!(variant.validate().is_err());
    }

    #[test]
    fn instruction_uses_run_threshold() {
        let variant = AgentVariant::standard().with_threshold(Confidence::saturating(90));
        let text = variant.instruction_for("Jane Doe");
        assert!(text.contains("below 90"));
        assert!(text.contains("Jane Doe"));
    }
}
