//! Experimental tools - public records and geography.
//!
//! Only registered for the extended toolset.

use serde::{Deserialize, Serialize};

use crate::domain::tools::geo::WorkPolicy;
use crate::domain::tools::ToolDefinition;

pub const SEARCH_DONATIONS: &str = "search_donations";
pub const SEARCH_CORPORATE_OFFICERS: &str = "search_corporate_officers";
pub const ANALYZE_INCOME_BY_ZIP: &str = "analyze_income_by_zip";
pub const ESTIMATE_COMMUTE_PROBABILITY: &str = "estimate_commute_probability";

// ═══════════════════════════════════════════════════════════════════════════
// Tool Parameters
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDonationsParams {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub employer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCorporateOfficersParams {
    pub name: String,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeIncomeByZipParams {
    pub zip_codes: Vec<String>,
    /// When present, only ZIPs inside the affordability window are returned.
    #[serde(default)]
    pub estimated_income: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateCommuteProbabilityParams {
    pub distance_miles: f64,
    #[serde(default)]
    pub policy: WorkPolicy,
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Definitions
// ═══════════════════════════════════════════════════════════════════════════

pub fn search_donations_tool() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_DONATIONS,
        "Search political donation filings. Filings list the donor's home address and employer \
         at the time of the donation.",
        serde_json::json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "state": { "type": "string" },
                "employer": { "type": "string" }
            }
        }),
    )
}

pub fn search_corporate_officers_tool() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_CORPORATE_OFFICERS,
        "Search state business registries for companies listing the person as an officer or \
         registered agent. Officer addresses are often residential.",
        serde_json::json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "jurisdiction": { "type": "string", "description": "Two-letter state code" }
            }
        }),
    )
}

pub fn analyze_income_by_zip_tool() -> ToolDefinition {
    ToolDefinition::new(
        ANALYZE_INCOME_BY_ZIP,
        "Median household income for candidate ZIP codes. Pass estimated_income to keep only \
         ZIPs a person on that income plausibly lives in.",
        serde_json::json!({
            "type": "object",
            "required": ["zip_codes"],
            "properties": {
                "zip_codes": {
                    "type": "array",
                    "minItems": 1,
                    "items": { "type": "string" }
                },
                "estimated_income": { "type": "integer", "minimum": 0 }
            }
        }),
    )
}

pub fn estimate_commute_probability_tool() -> ToolDefinition {
    ToolDefinition::new(
        ESTIMATE_COMMUTE_PROBABILITY,
        "Estimate the probability the person is at the office on a weekday, from the home to \
         office distance and the employer's attendance policy.",
        serde_json::json!({
            "type": "object",
            "required": ["distance_miles"],
            "properties": {
                "distance_miles": { "type": "number", "minimum": 0 },
                "policy": { "type": "string", "enum": ["onsite", "hybrid", "remote"] }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commute_policy_defaults_to_hybrid() {
        let params: EstimateCommuteProbabilityParams =
            serde_json::from_value(serde_json::json!({"distance_miles": 12.5})).unwrap();
        assert_eq!(params.policy, WorkPolicy::Hybrid);
    }
}
