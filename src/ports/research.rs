//! Research Capability Ports - the external lookups behind each tool.
//!
//! Every capability returns raw JSON. The dispatcher wraps it into a
//! `ToolResult`; capabilities never see the model or the transcript.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors from a capability backend. Always converted to a failed
/// `ToolResult`; they never abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("no results for {0}")]
    NotFound(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("capability not configured: {0}")]
    NotConfigured(&'static str),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type CapabilityResult = Result<Value, CapabilityError>;

#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn enrich(&self, linkedin_url: &str) -> CapabilityResult;
}

#[async_trait]
pub trait PeopleSearch: Send + Sync {
    async fn search(&self, name: &str, city: Option<&str>, state: Option<&str>) -> CapabilityResult;
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, category: &str, num_results: u32) -> CapabilityResult;
}

#[async_trait]
pub trait PropertyLookup: Send + Sync {
    async fn verify(&self, address: &str) -> CapabilityResult;
}

#[async_trait]
pub trait DistanceLookup: Send + Sync {
    async fn distance(&self, origin: &str, destination: &str) -> CapabilityResult;
}

#[async_trait]
pub trait DonationSearch: Send + Sync {
    async fn search(&self, name: &str, state: Option<&str>, employer: Option<&str>) -> CapabilityResult;
}

#[async_trait]
pub trait CorporateRegistry: Send + Sync {
    async fn search_officers(&self, name: &str, jurisdiction: Option<&str>) -> CapabilityResult;
}

/// Median household income lookup.
///
/// Expected shape: `{"zip": "...", "median_household_income": 85000}`.
#[async_trait]
pub trait CensusLookup: Send + Sync {
    async fn income_by_zip(&self, zip: &str) -> CapabilityResult;
}

/// The capability backends available to one dispatcher.
///
/// Base capabilities are mandatory. Experimental ones are optional; a tool
/// whose backend is missing returns a failed result instead of panicking.
#[derive(Clone)]
pub struct ResearchCapabilities {
    pub profiles: Arc<dyn ProfileLookup>,
    pub people: Arc<dyn PeopleSearch>,
    pub web: Arc<dyn WebSearch>,
    pub property: Arc<dyn PropertyLookup>,
    pub distance: Arc<dyn DistanceLookup>,
    pub donations: Option<Arc<dyn DonationSearch>>,
    pub corporate: Option<Arc<dyn CorporateRegistry>>,
    pub census: Option<Arc<dyn CensusLookup>>,
}

impl ResearchCapabilities {
    pub fn new(
        profiles: Arc<dyn ProfileLookup>,
        people: Arc<dyn PeopleSearch>,
        web: Arc<dyn WebSearch>,
        property: Arc<dyn PropertyLookup>,
        distance: Arc<dyn DistanceLookup>,
    ) -> Self {
        Self {
            profiles,
            people,
            web,
            property,
            distance,
            donations: None,
            corporate: None,
            census: None,
        }
    }

    pub fn with_donations(mut self, donations: Arc<dyn DonationSearch>) -> Self {
        self.donations = Some(donations);
        self
    }

    pub fn with_corporate(mut self, corporate: Arc<dyn CorporateRegistry>) -> Self {
        self.corporate = Some(corporate);
        self
    }

    pub fn with_census(mut self, census: Arc<dyn CensusLookup>) -> Self {
        self.census = Some(census);
        self
    }
}

impl std::fmt::Debug for ResearchCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchCapabilities")
            .field("donations", &self.donations.is_some())
            .field("corporate", &self.corporate.is_some())
            .field("census", &self.census.is_some())
            .finish_non_exhaustive()
    }
}
