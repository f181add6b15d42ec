//! Canned research backends.
//!
//! Every capability is answered from a lookup table keyed by the
//! lowercased request. A miss is a `NotFound`, which the dispatcher turns
//! into a failed tool result like any real backend would.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "people": { "jane doe": { "results": [ { "city": "Oakland" } ] } },
//!   "properties": { "12 elm st, oakland, ca": { "owner": "Jane Doe" } },
//!   "distances": { "12 elm st|acme hq": { "distance_miles": 11.2 } },
//!   "census": { "94110": { "zip": "94110", "median_household_income": 130000 } }
//! }
//! ```
//!
//! Distances are keyed `origin|destination`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::ports::{
    CapabilityError, CapabilityResult, CensusLookup, CorporateRegistry, DistanceLookup,
    DonationSearch, PeopleSearch, ProfileLookup, PropertyLookup, ResearchCapabilities, WebSearch,
};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read research fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid research fixtures: {0}")]
    Json(#[from] serde_json::Error),
}

type Table = HashMap<String, Value>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaticResearch {
    profiles: Table,
    people: Table,
    web: Table,
    properties: Table,
    distances: Table,
    donations: Table,
    officers: Table,
    census: Table,
}

impl StaticResearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let fixtures: Self = serde_json::from_str(json)?;
        Ok(fixtures.normalized())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// A small, self-consistent data set about one fictional person.
    pub fn sample() -> Self {
        Self::new()
            .with_profile(
                "https://www.linkedin.com/in/janedoe",
                json!({
                    "name": "Jane Doe",
                    "title": "Staff Engineer",
                    "company": "Acme Robotics",
                    "location": "San Francisco Bay Area",
                    "work_policy": "hybrid"
                }),
            )
            .with_person(
                "Jane Doe",
                json!({
                    "results": [{
                        "name": "Jane Doe",
                        "age_range": "35-44",
                        "addresses": ["12 Elm St, Oakland, CA 94610"]
                    }]
                }),
            )
            .with_web_result(
                "acme robotics headquarters",
                json!({
                    "results": [{
                        "title": "Acme Robotics - Contact",
                        "snippet": "HQ: 500 Mission St, San Francisco, CA 94105"
                    }]
                }),
            )
            .with_property(
                "12 Elm St, Oakland, CA 94610",
                json!({"owner": "Jane Doe", "property_type": "single_family", "owner_occupied": true}),
            )
            .with_property(
                "500 Mission St, San Francisco, CA 94105",
                json!({"owner": "Mission Office Holdings LLC", "property_type": "commercial"}),
            )
            .with_distance(
                "12 Elm St, Oakland, CA 94610",
                "500 Mission St, San Francisco, CA 94105",
                json!({"distance_miles": 11.4, "duration_minutes": 32}),
            )
            .with_donations(
                "Jane Doe",
                json!({
                    "results": [{
                        "amount": 250,
                        "employer": "Acme Robotics",
                        "address": "12 Elm St, Oakland, CA"
                    }]
                }),
            )
            .with_officer(
                "Jane Doe",
                json!({"results": []}),
            )
            .with_census("94110", 130_000)
            .with_census("94610", 145_000)
            .with_census("94027", 400_000)
    }

    pub fn with_profile(self, linkedin_url: &str, data: Value) -> Self {
        self.insert(|t| &mut t.profiles, linkedin_url, data)
    }

    pub fn with_person(self, name: &str, data: Value) -> Self {
        self.insert(|t| &mut t.people, name, data)
    }

    pub fn with_web_result(self, query: &str, data: Value) -> Self {
        self.insert(|t| &mut t.web, query, data)
    }

    pub fn with_property(self, address: &str, data: Value) -> Self {
        self.insert(|t| &mut t.properties, address, data)
    }

    pub fn with_distance(self, origin: &str, destination: &str, data: Value) -> Self {
        let key = distance_key(origin, destination);
        self.insert(|t| &mut t.distances, &key, data)
    }

    pub fn with_donations(self, name: &str, data: Value) -> Self {
        self.insert(|t| &mut t.donations, name, data)
    }

    pub fn with_officer(self, name: &str, data: Value) -> Self {
        self.insert(|t| &mut t.officers, name, data)
    }

    pub fn with_census(self, zip: &str, median_household_income: u64) -> Self {
        let data = json!({ "zip": zip, "median_household_income": median_household_income });
        self.insert(|t| &mut t.census, zip, data)
    }

    /// Wires every capability, experimental ones included.
    pub fn into_capabilities(self) -> ResearchCapabilities {
        let shared = Arc::new(self);
        Self::base(&shared)
            .with_donations(shared.clone())
            .with_corporate(shared.clone())
            .with_census(shared)
    }

    /// Wires only the five base capabilities.
    pub fn into_base_capabilities(self) -> ResearchCapabilities {
        Self::base(&Arc::new(self))
    }

    fn base(shared: &Arc<Self>) -> ResearchCapabilities {
        ResearchCapabilities::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared.clone(),
        )
    }

    fn insert(mut self, table: impl FnOnce(&mut Self) -> &mut Table, key: &str, data: Value) -> Self {
        table(&mut self).insert(normalize(key), data);
        self
    }

    fn normalized(self) -> Self {
        let norm = |table: Table| -> Table {
            table.into_iter().map(|(k, v)| (normalize(&k), v)).collect()
        };
        Self {
            profiles: norm(self.profiles),
            people: norm(self.people),
            web: norm(self.web),
            properties: norm(self.properties),
            distances: norm(self.distances),
            donations: norm(self.donations),
            officers: norm(self.officers),
            census: norm(self.census),
        }
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

fn distance_key(origin: &str, destination: &str) -> String {
    format!("{}|{}", normalize(origin), normalize(destination))
}

fn lookup(table: &Table, key: &str) -> CapabilityResult {
    table
        .get(&normalize(key))
        .cloned()
        .ok_or_else(|| CapabilityError::NotFound(key.to_string()))
}

#[async_trait]
impl ProfileLookup for StaticResearch {
    async fn enrich(&self, linkedin_url: &str) -> CapabilityResult {
        lookup(&self.profiles, linkedin_url)
    }
}

#[async_trait]
impl PeopleSearch for StaticResearch {
    async fn search(&self, name: &str, _city: Option<&str>, _state: Option<&str>) -> CapabilityResult {
        lookup(&self.people, name)
    }
}

#[async_trait]
impl WebSearch for StaticResearch {
    async fn search(&self, query: &str, _category: &str, num_results: u32) -> CapabilityResult {
        let mut data = lookup(&self.web, query)?;
        if let Some(results) = data.get_mut("results").and_then(Value::as_array_mut) {
            results.truncate(num_results as usize);
        }
        Ok(data)
    }
}

#[async_trait]
impl PropertyLookup for StaticResearch {
    async fn verify(&self, address: &str) -> CapabilityResult {
        lookup(&self.properties, address)
    }
}

#[async_trait]
impl DistanceLookup for StaticResearch {
    async fn distance(&self, origin: &str, destination: &str) -> CapabilityResult {
        let forward = distance_key(origin, destination);
        let reverse = distance_key(destination, origin);
        self.distances
            .get(&forward)
            .or_else(|| self.distances.get(&reverse))
            .cloned()
            .ok_or_else(|| CapabilityError::NotFound(format!("{} to {}", origin, destination)))
    }
}

#[async_trait]
impl DonationSearch for StaticResearch {
    async fn search(&self, name: &str, _state: Option<&str>, _employer: Option<&str>) -> CapabilityResult {
        lookup(&self.donations, name)
    }
}

#[async_trait]
impl CorporateRegistry for StaticResearch {
    async fn search_officers(&self, name: &str, _jurisdiction: Option<&str>) -> CapabilityResult {
        lookup(&self.officers, name)
    }
}

#[async_trait]
impl CensusLookup for StaticResearch {
    async fn income_by_zip(&self, zip: &str) -> CapabilityResult {
        lookup(&self.census, zip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookups_ignore_case_and_whitespace() {
        let research = StaticResearch::sample();
        let found = PeopleSearch::search(&research, "  JANE doe ", None, None).await.unwrap();
        assert_eq!(found["results"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn miss_is_not_found() {
        let research = StaticResearch::sample();
        assert_eq!(
            research.verify("nowhere").await,
            Err(CapabilityError::NotFound("nowhere".to_string()))
        );
    }

    #[tokio::test]
    async fn distance_is_symmetric() {
        let research = StaticResearch::sample();
        let there = research
            .distance("12 Elm St, Oakland, CA 94610", "500 Mission St, San Francisco, CA 94105")
            .await
            .unwrap();
        let back = research
            .distance("500 Mission St, San Francisco, CA 94105", "12 Elm St, Oakland, CA 94610")
            .await
            .unwrap();
        assert_eq!(there, back);
    }

    #[tokio::test]
    async fn web_search_honors_result_limit() {
        let research = StaticResearch::new().with_web_result(
            "q",
            json!({"results": [{"n": 1}, {"n": 2}, {"n": 3}]}),
        );
        let data = WebSearch::search(&research, "q", "general", 2).await.unwrap();
        assert_eq!(data["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fixture_keys_are_normalized() {
        let research = StaticResearch::from_json(
            r#"{"census": {"94110": {"zip": "94110", "median_household_income": 1}},
                "properties": {"1 MAIN ST": {"owner": "x"}}}"#,
        )
        .unwrap();
        assert!(research.verify("1 main st").await.is_ok());
        assert!(research.income_by_zip("94110").await.is_ok());
    }

    #[test]
    fn malformed_fixture_is_an_error() {
        assert!(matches!(
            StaticResearch::from_json("{not json"),
            Err(FixtureError::Json(_))
        ));
    }

    #[test]
    fn base_capabilities_leave_experimental_unset() {
        let caps = StaticResearch::sample().into_base_capabilities();
        assert!(caps.donations.is_none());
        assert!(caps.census.is_none());

        let caps = StaticResearch::sample().into_capabilities();
        assert!(caps.donations.is_some());
        assert!(caps.corporate.is_some());
    }
}
