//! Generation scenarios.
//!
//! A scenario is a named size/error policy for generated data. It controls
//! list sizes, text verbosity, and whether synthetic errors are injected.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Small, deterministic-feeling data for demos and snapshot tests.
    #[default]
    Demo,
    /// Moderately sized, randomized data.
    Realistic,
    /// Large collections for pagination and rendering stress.
    Large,
    /// Like realistic, but requests randomly fail with contract errors.
    Errors,
}

impl Scenario {
    /// Draw a raw list item count from the scenario's distribution.
    ///
    /// Callers clamp this against the complexity ceiling of the item schema.
    pub fn item_count(&self, rng: &mut StdRng) -> usize {
        match self {
            Scenario::Demo => 3,
            Scenario::Realistic => rng.gen_range(5..=15),
            Scenario::Large => rng.gen_range(50..=100),
            Scenario::Errors => rng.gen_range(2..=8),
        }
    }

    pub fn injects_errors(&self) -> bool {
        matches!(self, Scenario::Errors)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Demo => "demo",
            Scenario::Realistic => "realistic",
            Scenario::Large => "large",
            Scenario::Errors => "errors",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "demo" => Ok(Scenario::Demo),
            "realistic" => Ok(Scenario::Realistic),
            "large" => Ok(Scenario::Large),
            "errors" => Ok(Scenario::Errors),
            other => Err(format!(
                "Unknown scenario '{other}' (expected demo, realistic, large, or errors)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_demo_is_fixed() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(Scenario::Demo.item_count(&mut rng), 3);
        }
    }

    #[test]
    fn test_count_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = Scenario::Realistic.item_count(&mut rng);
            assert!((5..=15).contains(&n));
            let n = Scenario::Large.item_count(&mut rng);
            assert!((50..=100).contains(&n));
            let n = Scenario::Errors.item_count(&mut rng);
            assert!((2..=8).contains(&n));
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for s in ["demo", "realistic", "large", "errors"] {
            let scenario: Scenario = s.parse().unwrap();
            assert_eq!(scenario.as_str(), s);
        }
        assert!("chaos".parse::<Scenario>().is_err());
    }
}
