//! Tool Registry - the fixed, versioned tool list offered to the model.

use serde::{Deserialize, Serialize};

use super::definitions::*;
use super::ToolDefinition;

/// Which tool list a run offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toolset {
    /// Six core tools including `submit_decision`.
    #[default]
    Base,
    /// Base plus the four experimental tools.
    Extended,
}

impl Toolset {
    pub fn version(&self) -> &'static str {
        match self {
            Toolset::Base => "base-2024.1",
            Toolset::Extended => "extended-2024.1",
        }
    }
}

/// Ordered, immutable set of tool definitions for one run.
///
/// Order matters: it is the order the tools are presented to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRegistry {
    toolset: Toolset,
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn for_toolset(toolset: Toolset) -> Self {
        let mut tools = vec![
            enrich_profile_tool(),
            search_person_tool(),
            web_search_tool(),
            verify_property_tool(),
            calculate_distance_tool(),
        ];
        if toolset == Toolset::Extended {
            tools.extend([
                search_donations_tool(),
                search_corporate_officers_tool(),
                analyze_income_by_zip_tool(),
                estimate_commute_probability_tool(),
            ]);
        }
        // Decision tool last so the research tools read first.
        tools.push(submit_decision_tool());

        Self { toolset, tools }
    }

    pub fn toolset(&self) -> Toolset {
        self.toolset
    }

    pub fn version(&self) -> &'static str {
        self.toolset.version()
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(ToolDefinition::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
