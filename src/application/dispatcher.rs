//! Tool dispatcher - routes a proposed tool call to its implementation.
//!
//! `dispatch` never fails. Unknown names, schema violations and backend
//! errors all come back as a `ToolResult` with `success: false`, which the
//! model reads like any other tool output.

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::domain::agent::AgentDecision;
use crate::domain::tools::definitions::*;
use crate::domain::tools::geo::{estimate_commute_probability, AffordabilityWindow, ZipIncome};
use crate::domain::tools::{validate_input, ToolRegistry, ToolResult};
use crate::ports::{CapabilityError, CapabilityResult, ResearchCapabilities};

/// Result of one dispatched call.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub result: ToolResult,
    /// Set only for a well-formed `submit_decision` call.
    pub decision: Option<AgentDecision>,
}

impl DispatchOutcome {
    fn plain(result: ToolResult) -> Self {
        Self {
            result,
            decision: None,
        }
    }
}

impl From<ToolResult> for DispatchOutcome {
    fn from(result: ToolResult) -> Self {
        Self::plain(result)
    }
}

/// Name-to-implementation map over one registry.
pub struct ToolDispatcher {
    registry: ToolRegistry,
    capabilities: ResearchCapabilities,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry, capabilities: ResearchCapabilities) -> Self {
        Self {
            registry,
            capabilities,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Validates and executes one tool call.
    pub async fn dispatch(&self, name: &str, input: &Map<String, Value>) -> DispatchOutcome {
        let Some(definition) = self.registry.get_tool(name) else {
            warn!(tool = %name, "model called unknown tool");
            return ToolResult::failure(format!("Unknown tool: {}", name), None).into();
        };

        if let Err(err) = validate_input(definition.input_schema(), input) {
            warn!(tool = %name, error = %err, "tool input failed schema validation");
            return ToolResult::failure(format!("Invalid input for {}", name), Some(err.to_string()))
                .into();
        }

        debug!(tool = %name, "dispatching tool call");

        let outcome = match name {
            SUBMIT_DECISION => return self.submit_decision(input),
            ENRICH_PROFILE => self.enrich_profile(input).await,
            SEARCH_PERSON => self.search_person(input).await,
            WEB_SEARCH => self.web_search(input).await,
            VERIFY_PROPERTY => self.verify_property(input).await,
            CALCULATE_DISTANCE => self.calculate_distance(input).await,
            SEARCH_DONATIONS => self.search_donations(input).await,
            SEARCH_CORPORATE_OFFICERS => self.search_corporate_officers(input).await,
            ANALYZE_INCOME_BY_ZIP => self.analyze_income_by_zip(input).await,
            ESTIMATE_COMMUTE_PROBABILITY => self.estimate_commute(input),
            // Registered but not routed: a registry/dispatcher mismatch.
            other => Err(ToolResult::failure(
                format!("Tool {} has no implementation", other),
                None,
            )),
        };

        match outcome {
            Ok(result) | Err(result) => result.into(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Decision
    // ═══════════════════════════════════════════════════════════════════════

    fn submit_decision(&self, input: &Map<String, Value>) -> DispatchOutcome {
        match AgentDecision::from_tool_input(input) {
            Ok(decision) => {
                let summary = format!(
                    "Decision submitted: {} (confidence {})",
                    decision.recommendation, decision.confidence
                );
                let data = serde_json::to_value(&decision).unwrap_or(Value::Null);
                DispatchOutcome {
                    result: ToolResult::success(summary, data),
                    decision: Some(decision),
                }
            }
            Err(err) => {
                ToolResult::failure("Invalid decision", Some(err.to_string())).into()
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Base research tools
    // ═══════════════════════════════════════════════════════════════════════

    async fn enrich_profile(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: EnrichProfileParams = parse(ENRICH_PROFILE, input)?;
        let result = self.capabilities.profiles.enrich(&params.linkedin_url).await;
        Ok(wrap(result, |_| format!("Profile data retrieved for {}", params.linkedin_url)))
    }

    async fn search_person(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: SearchPersonParams = parse(SEARCH_PERSON, input)?;
        let result = self
            .capabilities
            .people
            .search(&params.name, params.city.as_deref(), params.state.as_deref())
            .await;
        Ok(wrap(result, |data| {
            format!("Found {} candidate record(s) for {}", count_results(data), params.name)
        }))
    }

    async fn web_search(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: WebSearchParams = parse(WEB_SEARCH, input)?;
        let result = self
            .capabilities
            .web
            .search(&params.query, params.category.as_str(), params.num_results)
            .await;
        Ok(wrap(result, |data| {
            format!(
                "{} {} result(s) for \"{}\"",
                count_results(data),
                params.category.as_str(),
                params.query
            )
        }))
    }

    async fn verify_property(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: VerifyPropertyParams = parse(VERIFY_PROPERTY, input)?;
        let result = self.capabilities.property.verify(&params.address).await;
        Ok(wrap(result, |_| format!("Property records retrieved for {}", params.address)))
    }

    async fn calculate_distance(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: CalculateDistanceParams = parse(CALCULATE_DISTANCE, input)?;
        let result = self
            .capabilities
            .distance
            .distance(&params.origin, &params.destination)
            .await;
        Ok(wrap(result, |data| match data.get("distance_miles").and_then(Value::as_f64) {
            Some(miles) => format!(
                "{} to {}: {:.1} miles",
                params.origin, params.destination, miles
            ),
            None => format!("Distance computed from {} to {}", params.origin, params.destination),
        }))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Experimental tools
    // ═══════════════════════════════════════════════════════════════════════

    async fn search_donations(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: SearchDonationsParams = parse(SEARCH_DONATIONS, input)?;
        let donations = self
            .capabilities
            .donations
            .as_ref()
            .ok_or_else(|| not_configured("donation search"))?;
        let result = donations
            .search(&params.name, params.state.as_deref(), params.employer.as_deref())
            .await;
        Ok(wrap(result, |data| {
            format!("Found {} donation filing(s) for {}", count_results(data), params.name)
        }))
    }

    async fn search_corporate_officers(
        &self,
        input: &Map<String, Value>,
    ) -> Result<ToolResult, ToolResult> {
        let params: SearchCorporateOfficersParams = parse(SEARCH_CORPORATE_OFFICERS, input)?;
        let corporate = self
            .capabilities
            .corporate
            .as_ref()
            .ok_or_else(|| not_configured("corporate registry"))?;
        let result = corporate
            .search_officers(&params.name, params.jurisdiction.as_deref())
            .await;
        Ok(wrap(result, |data| {
            format!("Found {} officer record(s) for {}", count_results(data), params.name)
        }))
    }

    async fn analyze_income_by_zip(
        &self,
        input: &Map<String, Value>,
    ) -> Result<ToolResult, ToolResult> {
        let params: AnalyzeIncomeByZipParams = parse(ANALYZE_INCOME_BY_ZIP, input)?;
        let census = self
            .capabilities
            .census
            .as_ref()
            .ok_or_else(|| not_configured("census lookup"))?;

        let lookups = join_all(params.zip_codes.iter().map(|zip| census.income_by_zip(zip))).await;

        let mut rows = Vec::new();
        let mut failed = Vec::new();
        for (zip, lookup) in params.zip_codes.iter().zip(lookups) {
            match lookup {
                Ok(raw) => match zip_income(zip, raw) {
                    Some(row) => rows.push(row),
                    None => failed.push(json!({ "zip": zip, "error": "unexpected census payload" })),
                },
                Err(err) => failed.push(json!({ "zip": zip, "error": err.to_string() })),
            }
        }

        if rows.is_empty() {
            return Ok(ToolResult::failure_with_data(
                "No income data for any requested ZIP code",
                json!({ "failed": failed }),
            ));
        }

        let (matches, window) = match params.estimated_income {
            Some(income) => {
                let window = AffordabilityWindow::around(income);
                (window.filter(&rows), Some(window))
            }
            None => (rows.clone(), None),
        };

        let summary = match window {
            Some(w) => format!(
                "{} of {} ZIP code(s) within ${}-${} median household income",
                matches.len(),
                rows.len(),
                w.min_income,
                w.max_income
            ),
            None => format!("Median household income for {} ZIP code(s)", rows.len()),
        };

        Ok(ToolResult::success(
            summary,
            json!({
                "rows": rows,
                "window": window,
                "matches": matches,
                "failed": failed,
            }),
        ))
    }

    fn estimate_commute(&self, input: &Map<String, Value>) -> Result<ToolResult, ToolResult> {
        let params: EstimateCommuteProbabilityParams = parse(ESTIMATE_COMMUTE_PROBABILITY, input)?;
        let estimate = estimate_commute_probability(params.distance_miles, params.policy);
        let summary = format!(
            "{:.0}% chance of being in the office on a weekday ({:?})",
            estimate.probability * 100.0,
            estimate.band
        );
        let data = serde_json::to_value(estimate).unwrap_or(Value::Null);
        Ok(ToolResult::success(summary, data))
    }
}

/// Deserializes already-validated input into the tool's params type.
fn parse<P: DeserializeOwned>(tool: &str, input: &Map<String, Value>) -> Result<P, ToolResult> {
    serde_json::from_value(Value::Object(input.clone())).map_err(|e| {
        ToolResult::failure(format!("Invalid input for {}", tool), Some(e.to_string()))
    })
}

fn wrap(result: CapabilityResult, summarize: impl FnOnce(&Value) -> String) -> ToolResult {
    match result {
        Ok(data) => {
            let summary = summarize(&data);
            ToolResult::success(summary, data)
        }
        Err(err) => capability_failure(err),
    }
}

fn capability_failure(err: CapabilityError) -> ToolResult {
    let summary = match &err {
        CapabilityError::NotFound(_) => "No results found",
        CapabilityError::Upstream(_) => "Upstream service failed",
        CapabilityError::NotConfigured(_) => "Capability not configured",
        CapabilityError::InvalidRequest(_) => "Request rejected by service",
    };
    ToolResult::failure(summary, Some(err.to_string()))
}

fn not_configured(capability: &'static str) -> ToolResult {
    capability_failure(CapabilityError::NotConfigured(capability))
}

fn count_results(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.len(),
        Value::Object(map) => map
            .get("results")
            .and_then(Value::as_array)
            .map_or(1, Vec::len),
        _ => 0,
    }
}

fn zip_income(zip: &str, raw: Value) -> Option<ZipIncome> {
    let income = raw
        .get("median_household_income")
        .and_then(Value::as_u64)?;
    Some(ZipIncome {
        zip: zip.to_string(),
        median_household_income: income,
    })
}
