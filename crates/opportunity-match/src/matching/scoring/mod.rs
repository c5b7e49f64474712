mod factors;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Opportunity, OpportunityId, Profile};
use super::error::{ConfigurationError, ScoringError};
use super::weights::{MatchFactor, MatchingConfig};

const MAX_SCORE: f64 = 100.0;
// Exact halves can land a few ulps below x.5 after the division.
const HALF_UP_TOLERANCE: f64 = 1e-9;

/// Stateless scorer applying the factor weight table to one (profile, opportunity) pair.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: MatchingConfig,
}

impl ScoringEngine {
    /// Build an engine, rejecting weight tables that break the documented totals.
    pub fn new(config: MatchingConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[cfg(test)]
    pub(crate) fn unchecked(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score a pair. The result depends on nothing but the two inputs and the weight table.
    pub fn score(
        &self,
        profile: &Profile,
        opportunity: &Opportunity,
    ) -> Result<ScoreResult, ScoringError> {
        let factors = factors::score_factors(profile, opportunity, &self.config);

        let mut breakdown = ScoreBreakdown::default();
        let mut pools = BTreeMap::new();
        let mut total_earned = 0.0;
        let mut total_pool = 0.0;

        for (factor, factor_score) in factors {
            factor_score.check(factor)?;
            total_earned += factor_score.earned;
            total_pool += factor_score.pool;
            breakdown.record(factor, factor_score.earned);
            pools.insert(factor, factor_score.pool);
        }

        breakdown.degenerate = total_pool == 0.0;
        let score = if breakdown.degenerate {
            0
        } else {
            round_half_up(total_earned * MAX_SCORE / total_pool)
        };

        Ok(ScoreResult {
            opportunity_id: opportunity.id.clone(),
            score,
            breakdown,
            pools,
        })
    }
}

/// Earned points and pool size for one factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FactorScore {
    pub earned: f64,
    pub pool: f64,
}

impl FactorScore {
    fn check(&self, factor: MatchFactor) -> Result<(), ScoringError> {
        if !self.pool.is_finite() || !self.earned.is_finite() {
            return Err(ScoringError::NonFinite { factor });
        }
        if self.pool < 0.0 {
            return Err(ScoringError::NegativePool {
                factor,
                pool: self.pool,
            });
        }
        if self.earned < 0.0 {
            return Err(ScoringError::NegativeEarned {
                factor,
                earned: self.earned,
            });
        }
        Ok(())
    }
}

/// Earned points per factor. `degenerate` marks a zero total pool, where the score is 0 by
/// convention rather than by lack of fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub credential: f64,
    pub level: f64,
    pub location: f64,
    pub degenerate: bool,
}

impl ScoreBreakdown {
    pub fn earned(&self, factor: MatchFactor) -> f64 {
        match factor {
            MatchFactor::Skill => self.skill,
            MatchFactor::Credential => self.credential,
            MatchFactor::Level => self.level,
            MatchFactor::Location => self.location,
        }
    }

    fn record(&mut self, factor: MatchFactor, earned: f64) {
        match factor {
            MatchFactor::Skill => self.skill = earned,
            MatchFactor::Credential => self.credential = earned,
            MatchFactor::Level => self.level = earned,
            MatchFactor::Location => self.location = earned,
        }
    }
}

/// Per-opportunity score with the earned breakdown and the pool each factor contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub opportunity_id: OpportunityId,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub pools: BTreeMap<MatchFactor, f64>,
}

impl ScoreResult {
    pub fn earned(&self, factor: MatchFactor) -> f64 {
        self.breakdown.earned(factor)
    }

    pub fn pool(&self, factor: MatchFactor) -> f64 {
        self.pools.get(&factor).copied().unwrap_or(0.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.breakdown.degenerate
    }
}

fn round_half_up(value: f64) -> u8 {
    (value + 0.5 + HALF_UP_TOLERANCE)
        .floor()
        .clamp(0.0, MAX_SCORE) as u8
}
