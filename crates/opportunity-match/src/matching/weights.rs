use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Points available across all four factors for a single requirement of each kind.
pub const DOCUMENTED_TOTAL: f64 = 100.0;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Factor weights shipped with the engine (skill per requirement / credential / level / location).
pub const DEFAULT_WEIGHTS: FactorWeights = FactorWeights {
    skill: 40.0,
    credential: 30.0,
    level: 20.0,
    location: 10.0,
};

/// Independent scoring factors reported in every breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    Skill,
    Credential,
    Level,
    Location,
}

impl MatchFactor {
    pub const ALL: [MatchFactor; 4] = [
        MatchFactor::Skill,
        MatchFactor::Credential,
        MatchFactor::Level,
        MatchFactor::Location,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MatchFactor::Skill => "skill",
            MatchFactor::Credential => "credential",
            MatchFactor::Level => "level",
            MatchFactor::Location => "location",
        }
    }
}

impl fmt::Display for MatchFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static weight table. The skill weight applies per required skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub skill: f64,
    pub credential: f64,
    pub level: f64,
    pub location: f64,
}

impl FactorWeights {
    pub fn get(&self, factor: MatchFactor) -> f64 {
        match factor {
            MatchFactor::Skill => self.skill,
            MatchFactor::Credential => self.credential,
            MatchFactor::Level => self.level,
            MatchFactor::Location => self.location,
        }
    }

    pub fn sum(&self) -> f64 {
        self.skill + self.credential + self.level + self.location
    }

    /// Reject tables that could yield negative pools or drift from the documented total.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for factor in MatchFactor::ALL {
            let value = self.get(factor);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidWeight { factor, value });
            }
        }

        let actual = self.sum();
        if (actual - DOCUMENTED_TOTAL).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigurationError::WeightTotal {
                expected: DOCUMENTED_TOTAL,
                actual,
            });
        }

        Ok(())
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// How a factor without declared requirements contributes to the denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolPolicy {
    /// Empty factors drop out of the denominator entirely.
    #[default]
    ExcludeEmpty,
    /// Empty factors keep a full pool and earn nothing.
    PenalizeEmpty,
}

impl PoolPolicy {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclude-empty" | "exclude_empty" | "exclude" => Some(Self::ExcludeEmpty),
            "penalize-empty" | "penalize_empty" | "penalize" => Some(Self::PenalizeEmpty),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PoolPolicy::ExcludeEmpty => "exclude-empty",
            PoolPolicy::PenalizeEmpty => "penalize-empty",
        }
    }
}

/// Scoring configuration consumed by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub weights: FactorWeights,
    pub pool_policy: PoolPolicy,
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_documented_total() {
        assert!((DEFAULT_WEIGHTS.sum() - DOCUMENTED_TOTAL).abs() < 1e-9);
        assert!(MatchingConfig::default().validate().is_ok());
    }

    #[test]
    fn rebalanced_weights_are_accepted() {
        let weights = FactorWeights {
            skill: 50.0,
            credential: 20.0,
            level: 20.0,
            location: 10.0,
        };
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let weights = FactorWeights {
            skill: 60.0,
            credential: -10.0,
            level: 40.0,
            location: 10.0,
        };
        match weights.validate() {
            Err(ConfigurationError::InvalidWeight { factor, value }) => {
                assert_eq!(factor, MatchFactor::Credential);
                assert_eq!(value, -10.0);
            }
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn total_drift_is_rejected() {
        let weights = FactorWeights {
            location: 15.0,
            ..DEFAULT_WEIGHTS
        };
        match weights.validate() {
            Err(ConfigurationError::WeightTotal { expected, actual }) => {
                assert_eq!(expected, DOCUMENTED_TOTAL);
                assert_eq!(actual, 105.0);
            }
            other => panic!("expected weight total error, got {other:?}"),
        }
    }

    #[test]
    fn pool_policy_labels_round_trip() {
        for policy in [PoolPolicy::ExcludeEmpty, PoolPolicy::PenalizeEmpty] {
            assert_eq!(PoolPolicy::from_label(policy.label()), Some(policy));
        }
        assert_eq!(PoolPolicy::from_label(" Penalize "), Some(PoolPolicy::PenalizeEmpty));
        assert_eq!(PoolPolicy::from_label("renormalize"), None);
    }
}
