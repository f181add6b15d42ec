//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ModelProvider` - language model calls
//! - Research capabilities - the lookups behind each tool
//! - `EventSink` - consumer of the agent event stream
//! - `CancellationProbe` - external stop signal

mod cancellation;
mod event_sink;
mod model_provider;
mod research;

pub use cancellation::{CancellationProbe, NeverCancel};
pub use event_sink::{EventSink, NullEventSink};
pub use model_provider::{
    provider_for_run, CallOptions, ModelProvider, ModelResponse, ProviderError, ProviderInfo,
    StopReason, TokenUsage,
};
pub use research::{
    CapabilityError, CapabilityResult, CensusLookup, CorporateRegistry, DistanceLookup,
    DonationSearch, PeopleSearch, ProfileLookup, PropertyLookup, ResearchCapabilities, WebSearch,
};
