//! Base research tools - available to every variant.
//!
//! Profile enrichment, people search, web search, property verification and
//! distance calculation.

use serde::{Deserialize, Serialize};

use crate::domain::tools::ToolDefinition;

pub const ENRICH_PROFILE: &str = "enrich_profile";
pub const SEARCH_PERSON: &str = "search_person";
pub const WEB_SEARCH: &str = "web_search";
pub const VERIFY_PROPERTY: &str = "verify_property";
pub const CALCULATE_DISTANCE: &str = "calculate_distance";

// ═══════════════════════════════════════════════════════════════════════════
// Enums
// ═══════════════════════════════════════════════════════════════════════════

/// Search index to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    #[default]
    General,
    News,
    Company,
    People,
}

impl SearchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::General => "general",
            SearchCategory::News => "news",
            SearchCategory::Company => "company",
            SearchCategory::People => "people",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Parameters
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichProfileParams {
    pub linkedin_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPersonParams {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchParams {
    pub query: String,
    #[serde(default)]
    pub category: SearchCategory,
    #[serde(default = "default_num_results")]
    pub num_results: u32,
}

fn default_num_results() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPropertyParams {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateDistanceParams {
    pub origin: String,
    pub destination: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Definitions
// ═══════════════════════════════════════════════════════════════════════════

pub fn enrich_profile_tool() -> ToolDefinition {
    ToolDefinition::new(
        ENRICH_PROFILE,
        "Fetch structured profile data (current employer, title, location, work history) \
         for a LinkedIn profile URL. Usually the best first call.",
        serde_json::json!({
            "type": "object",
            "required": ["linkedin_url"],
            "properties": {
                "linkedin_url": {
                    "type": "string",
                    "description": "Full LinkedIn profile URL"
                }
            }
        }),
    )
}

pub fn search_person_tool() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_PERSON,
        "Search public people records for a name, optionally narrowed by city and state. \
         Returns candidate residential addresses with match scores.",
        serde_json::json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "description": "Full name of the person" },
                "city": { "type": "string" },
                "state": { "type": "string", "description": "Two-letter state code" }
            }
        }),
    )
}

pub fn web_search_tool() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Run a web search. Use the company category for office locations and return-to-office \
         policies, news for recent moves, people for personal pages.",
        serde_json::json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": { "type": "string" },
                "category": {
                    "type": "string",
                    "enum": ["general", "news", "company", "people"]
                },
                "num_results": { "type": "integer", "minimum": 1, "maximum": 20 }
            }
        }),
    )
}

pub fn verify_property_tool() -> ToolDefinition {
    ToolDefinition::new(
        VERIFY_PROPERTY,
        "Look up property records for an address: owner names, property type and last sale. \
         Use to confirm a candidate home address actually belongs to the person.",
        serde_json::json!({
            "type": "object",
            "required": ["address"],
            "properties": {
                "address": { "type": "string", "description": "Full street address" }
            }
        }),
    )
}

pub fn calculate_distance_tool() -> ToolDefinition {
    ToolDefinition::new(
        CALCULATE_DISTANCE,
        "Driving distance and typical travel time between two addresses.",
        serde_json::json!({
            "type": "object",
            "required": ["origin", "destination"],
            "properties": {
                "origin": { "type": "string" },
                "destination": { "type": "string" }
            }
        }),
    )
}
