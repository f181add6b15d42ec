//! Logging configuration

use serde::Deserialize;

/// Controls the `tracing-subscriber` output format.
///
/// The level filter itself comes from `RUST_LOG`; `filter` is the fallback
/// when that is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Default filter directive
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_human_readable_info() {
        let config = LogConfig::default();
        assert!(!config.json);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn deserializes_partial() {
        let config: LogConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(config.json);
        assert_eq!(config.filter, "info");
    }
}
