//! Local estimators behind the experimental geography tools.
//!
//! Neither function touches the network, so they are deterministic and
//! cheap to call on every turn.

use serde::{Deserialize, Serialize};

/// Employer's attendance policy as stated in public sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPolicy {
    Onsite,
    #[default]
    Hybrid,
    Remote,
}

impl WorkPolicy {
    fn attendance_factor(&self) -> f64 {
        match self {
            WorkPolicy::Onsite => 1.0,
            WorkPolicy::Hybrid => 0.6,
            WorkPolicy::Remote => 0.1,
        }
    }
}

/// Rough likelihood band for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodBand {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommuteEstimate {
    pub distance_miles: f64,
    pub policy: WorkPolicy,
    /// Probability the person is at the office on a given weekday, 0.0 to 1.0.
    pub probability: f64,
    pub band: LikelihoodBand,
}

/// Half of people stop commuting daily somewhere around this distance.
const COMMUTE_MIDPOINT_MILES: f64 = 35.0;
const COMMUTE_SPREAD_MILES: f64 = 8.0;

/// Estimates how likely someone is to be at their office on a weekday.
///
/// A logistic falloff over home-to-office distance, scaled by the
/// employer's attendance policy. Negative distances are treated as zero.
pub fn estimate_commute_probability(distance_miles: f64, policy: WorkPolicy) -> CommuteEstimate {
    let distance = if distance_miles.is_finite() {
        distance_miles.max(0.0)
    } else {
        f64::MAX
    };
    let falloff = 1.0 / (1.0 + ((distance - COMMUTE_MIDPOINT_MILES) / COMMUTE_SPREAD_MILES).exp());
    let probability = (falloff * policy.attendance_factor()).clamp(0.0, 1.0);

    let band = if probability >= 0.65 {
        LikelihoodBand::High
    } else if probability >= 0.35 {
        LikelihoodBand::Medium
    } else {
        LikelihoodBand::Low
    };

    CommuteEstimate {
        distance_miles: distance,
        policy,
        probability: (probability * 1000.0).round() / 1000.0,
        band,
    }
}

/// Median household income for one ZIP code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipIncome {
    pub zip: String,
    pub median_household_income: u64,
}

/// Income range a person on a given salary plausibly lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityWindow {
    pub min_income: u64,
    pub max_income: u64,
}

impl AffordabilityWindow {
    /// Half to double the estimated income.
    pub fn around(estimated_income: u64) -> Self {
        Self {
            min_income: estimated_income / 2,
            max_income: estimated_income.saturating_mul(2),
        }
    }

    pub fn contains(&self, income: u64) -> bool {
        (self.min_income..=self.max_income).contains(&income)
    }

    /// Keeps the ZIPs inside the window, best match (closest to the window
    /// midpoint) first.
    pub fn filter(&self, rows: &[ZipIncome]) -> Vec<ZipIncome> {
        let midpoint = (self.min_income + self.max_income) / 2;
        let mut kept: Vec<ZipIncome> = rows
            .iter()
            .filter(|row| self.contains(row.median_household_income))
            .cloned()
            .collect();
        kept.sort_by_key(|row| row.median_household_income.abs_diff(midpoint));
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearby_onsite_worker_is_high() {
        let estimate = estimate_commute_probability(5.0, WorkPolicy::Onsite);
        assert_eq!(estimate.band, LikelihoodBand::High);
        assert!(estimate.probability > 0.95);
    }

    #[test]
    fn remote_worker_is_low_even_when_close() {
        let estimate = estimate_commute_probability(2.0, WorkPolicy::Remote);
        assert_eq!(estimate.band, LikelihoodBand::Low);
    }

    #[test]
    fn midpoint_distance_is_even_odds_for_onsite() {
        let estimate = estimate_commute_probability(COMMUTE_MIDPOINT_MILES, WorkPolicy::Onsite);
        assert!((estimate.probability - 0.5).abs() < 1e-9);
        assert_eq!(estimate.band, LikelihoodBand::Medium);
    }

    #[test]
    fn negative_distance_clamps_to_zero() {
        let estimate = estimate_commute_probability(-10.0, WorkPolicy::Onsite);
        assert_eq!(estimate.distance_miles, 0.0);
    }

    #[test]
    fn affordability_filter_keeps_window_and_sorts() {
        let window = AffordabilityWindow::around(100_000);
        let rows = vec![
            ZipIncome { zip: "10001".into(), median_household_income: 40_000 },
            ZipIncome { zip: "10002".into(), median_household_income: 190_000 },
            ZipIncome { zip: "10003".into(), median_household_income: 120_000 },
            ZipIncome { zip: "10004".into(), median_household_income: 250_000 },
        ];

        let kept = window.filter(&rows);
        let zips: Vec<&str> = kept.iter().map(|r| r.zip.as_str()).collect();
        assert_eq!(zips, vec!["10003", "10002"]);
    }

    proptest! {
        #[test]
        fn probability_never_increases_with_distance(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            let p_near = estimate_commute_probability(near, WorkPolicy::Onsite).probability;
            let p_far = estimate_commute_probability(far, WorkPolicy::Onsite).probability;
            prop_assert!(p_near >= p_far);
        }

        #[test]
        fn probability_is_bounded(d in -50.0f64..500.0) {
            let p = estimate_commute_probability(d, WorkPolicy::Hybrid).probability;
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
