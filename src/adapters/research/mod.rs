//! Research capability adapters.
//!
//! - `StaticResearch` - Canned lookups from an in-memory table or a JSON
//!   fixture file, for tests, demos and offline runs

mod static_research;

pub use static_research::{FixtureError, StaticResearch};
