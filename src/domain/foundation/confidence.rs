//! Confidence value object (0-100 scale).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ValidationError;

/// Self-reported certainty of a decision, 0 to 100 inclusive.
///
/// Deserialization rejects values above 100 rather than clamping, so a model
/// that reports `140` gets a validation error back instead of an inflated pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Confidence(u8);

impl Confidence {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Creates a Confidence, returning error if out of range.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(0..=100).contains(&value) {
            return Err(ValidationError::out_of_range("confidence", 0, 100, value));
        }
        Ok(Self(value as u8))
    }

    /// Creates a Confidence, clamping to the valid range.
    pub fn saturating(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Models occasionally emit 82.0 instead of 82.
        let raw = f64::deserialize(deserializer)?;
        if raw.fract() != 0.0 {
            return Err(serde::de::Error::custom(format!(
                "confidence must be a whole number, got {}",
                raw
            )));
        }
        Confidence::try_new(raw as i64).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_accepts_bounds() {
        assert_eq!(Confidence::try_new(0).unwrap().value(), 0);
        assert_eq!(Confidence::try_new(100).unwrap().value(), 100);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(Confidence::try_new(-1).is_err());
        assert!(Confidence::try_new(101).is_err());
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(Confidence::saturating(250), Confidence::MAX);
    }

    #[test]
    fn deserializes_integer_and_integral_float() {
        let a: Confidence = serde_json::from_str("82").unwrap();
        let b: Confidence = serde_json::from_str("82.0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deserialize_rejects_fraction_and_overflow() {
        assert!(serde_json::from_str::<Confidence>("82.5").is_err());
        assert!(serde_json::from_str::<Confidence>("140").is_err());
    }
}
