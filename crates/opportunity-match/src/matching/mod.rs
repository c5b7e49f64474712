//! Opportunity-to-profile compatibility scoring and ranking.
//!
//! Everything in this module is a pure function of its inputs: profiles are normalized by the
//! [`ProfileAccessor`], catalogs are validated into an [`OpportunityCatalog`], each pair is
//! scored by the [`ScoringEngine`], and the [`RankingService`] sorts and filters the results.
//! The [`MatchingService`] facade chains those steps and adds a versioned [`RankingCache`].

pub mod cache;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod profile;
pub mod ranking;
pub mod router;
pub mod scoring;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use cache::{CacheKey, RankingCache};
pub use catalog::{normalize_opportunity, CatalogLoad, OpportunityCatalog, RejectedOpportunity};
pub use domain::{
    Availability, Credential, CredentialTier, Difficulty, ExclusivityClass, LocationConstraint,
    Opportunity, OpportunityCategory, OpportunityId, Profile, ProfileId, RawCredential,
    RawLocationConstraint, RawOpportunity, RawProfile, RawSkill, RawSkills, SkillId,
};
pub use error::{ConfigurationError, ScoringError, ValidationError};
pub use profile::ProfileAccessor;
pub use ranking::{RankedResult, RankingFilter, RankingPredicate, RankingService};
pub use router::matching_router;
pub use scoring::{ScoreBreakdown, ScoreResult, ScoringEngine};
pub use service::{MatchingService, MatchingServiceError, RankingReport, RankingRequest};
pub use weights::{FactorWeights, MatchFactor, MatchingConfig, PoolPolicy, DEFAULT_WEIGHTS};
