//! Research backend configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where canned capability data comes from.
///
/// Without a fixtures file the built-in sample data set is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchConfig {
    /// JSON fixtures for `StaticResearch`
    pub fixtures_path: Option<PathBuf>,
}

impl ResearchConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.fixtures_path {
            Some(path) if !path.is_file() => Err(ValidationError::FixturesNotFound(
                path.display().to_string(),
            )),
            _ => Ok(()),
        }
    }
}
