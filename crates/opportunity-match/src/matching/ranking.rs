use std::cmp::Ordering;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{ExclusivityClass, Opportunity, OpportunityCategory, Profile};
use super::error::ScoringError;
use super::scoring::{ScoreResult, ScoringEngine};

/// Scored opportunity with its zero-based position and the keys used to order and filter it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub exclusivity: ExclusivityClass,
    pub deadline: Option<NaiveDate>,
    pub category: Option<OpportunityCategory>,
}

/// Applies the scoring engine across a catalog and imposes the deterministic ranking order.
#[derive(Debug, Clone, Default)]
pub struct RankingService {
    engine: ScoringEngine,
}

impl RankingService {
    pub fn new(engine: ScoringEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score every opportunity in parallel, then sort the complete set once.
    ///
    /// Order: score descending, platform-exclusive before external, nearer deadline first
    /// (missing deadlines last), opportunity id ascending.
    pub fn rank(
        &self,
        profile: &Profile,
        opportunities: &[Opportunity],
    ) -> Result<Vec<RankedResult>, ScoringError> {
        let mut ranked = opportunities
            .par_iter()
            .map(|opportunity| {
                self.engine
                    .score(profile, opportunity)
                    .map(|result| RankedResult {
                        rank: 0,
                        result,
                        exclusivity: opportunity.exclusivity,
                        deadline: opportunity.deadline,
                        category: opportunity.category,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(compare_ranked);
        for (position, entry) in ranked.iter_mut().enumerate() {
            entry.rank = position;
        }

        debug!(
            profile_id = %profile.id.0,
            opportunities = ranked.len(),
            top_score = ranked.first().map(|entry| entry.result.score),
            "ranked catalog"
        );

        Ok(ranked)
    }

    /// Keep the entries matching `predicate`, preserving ranking order and rank numbers.
    pub fn filter(ranked: &[RankedResult], predicate: &RankingPredicate) -> Vec<RankedResult> {
        ranked
            .iter()
            .filter(|entry| predicate.matches(entry))
            .cloned()
            .collect()
    }
}

pub(crate) fn compare_ranked(left: &RankedResult, right: &RankedResult) -> Ordering {
    right
        .result
        .score
        .cmp(&left.result.score)
        .then_with(|| {
            left.exclusivity
                .precedence()
                .cmp(&right.exclusivity.precedence())
        })
        .then_with(|| compare_deadlines(left.deadline, right.deadline))
        .then_with(|| left.result.opportunity_id.cmp(&right.result.opportunity_id))
}

fn compare_deadlines(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Single filter condition over a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPredicate {
    Category(OpportunityCategory),
    /// Any integer; thresholds above 100 match nothing and thresholds at or below 0 match all.
    MinimumScore(i64),
    ExclusiveOnly,
}

impl RankingPredicate {
    pub fn matches(&self, entry: &RankedResult) -> bool {
        match self {
            RankingPredicate::Category(category) => entry.category == Some(*category),
            RankingPredicate::MinimumScore(threshold) => {
                i64::from(entry.result.score) >= *threshold
            }
            RankingPredicate::ExclusiveOnly => {
                entry.exclusivity == ExclusivityClass::PlatformExclusive
            }
        }
    }
}

/// Dashboard filter query; every populated field must hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingFilter {
    #[serde(default)]
    pub category: Option<OpportunityCategory>,
    #[serde(default, alias = "minScore")]
    pub min_score: Option<i64>,
    #[serde(default, alias = "exclusiveOnly")]
    pub exclusive_only: bool,
}

impl RankingFilter {
    pub fn predicates(&self) -> Vec<RankingPredicate> {
        let mut predicates = Vec::new();
        if let Some(category) = self.category {
            predicates.push(RankingPredicate::Category(category));
        }
        if let Some(threshold) = self.min_score {
            predicates.push(RankingPredicate::MinimumScore(threshold));
        }
        if self.exclusive_only {
            predicates.push(RankingPredicate::ExclusiveOnly);
        }
        predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    pub fn apply(&self, ranked: &[RankedResult]) -> Vec<RankedResult> {
        self.predicates()
            .iter()
            .fold(ranked.to_vec(), |remaining, predicate| {
                RankingService::filter(&remaining, predicate)
            })
    }
}
