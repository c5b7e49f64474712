use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cache::{CacheKey, RankingCache};
use super::catalog::{OpportunityCatalog, RejectedOpportunity};
use super::domain::ProfileId;
use super::error::{ConfigurationError, ScoringError, ValidationError};
use super::profile::ProfileAccessor;
use super::ranking::{RankedResult, RankingFilter, RankingService};
use super::scoring::ScoringEngine;
use super::weights::MatchingConfig;

/// Inbound ranking request as posted by the member dashboard. The profile and opportunities stay
/// untyped until validation so shape errors surface as [`ValidationError`]s.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingRequest {
    #[serde(default)]
    pub profile: serde_json::Value,
    #[serde(default, alias = "profileVersion")]
    pub profile_version: Option<String>,
    #[serde(default, alias = "catalogVersion")]
    pub catalog_version: Option<String>,
    #[serde(default)]
    pub opportunities: Vec<serde_json::Value>,
    #[serde(default)]
    pub filter: RankingFilter,
}

/// Ranked, filtered view plus the catalog entries that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub profile_id: ProfileId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,
    pub results: Vec<RankedResult>,
    pub rejected: Vec<RejectedOpportunity>,
    pub cached: bool,
}

/// Facade running `normalize -> score -> rank -> filter` with an optional versioned cache.
#[derive(Debug)]
pub struct MatchingService {
    ranking: RankingService,
    cache: RankingCache,
}

impl MatchingService {
    pub fn new(config: MatchingConfig, cache_capacity: usize) -> Result<Self, ConfigurationError> {
        let engine = ScoringEngine::new(config)?;
        Ok(Self::with_engine(engine, cache_capacity))
    }

    pub fn with_engine(engine: ScoringEngine, cache_capacity: usize) -> Self {
        Self {
            ranking: RankingService::new(engine),
            cache: RankingCache::new(cache_capacity),
        }
    }

    pub fn ranking(&self) -> &RankingService {
        &self.ranking
    }

    pub fn cache(&self) -> &RankingCache {
        &self.cache
    }

    /// Rank a raw request. An invalid profile fails the request; invalid opportunities are
    /// reported in `rejected` while the rest are ranked.
    pub fn rank_request(
        &self,
        request: RankingRequest,
    ) -> Result<RankingReport, MatchingServiceError> {
        let RankingRequest {
            profile,
            profile_version,
            catalog_version,
            opportunities,
            filter,
        } = request;

        let profile = ProfileAccessor::normalize_json(profile)?;
        let load = OpportunityCatalog::load_json(catalog_version, opportunities);
        for rejection in &load.rejected {
            warn!(
                index = rejection.index,
                opportunity_id = rejection.opportunity_id.as_deref().unwrap_or("<missing>"),
                error = %rejection.error,
                "rejected catalog entry"
            );
        }
        let catalog = load.catalog;

        let (ranked, cached) = match (profile_version, catalog.version()) {
            (Some(profile_version), Some(catalog_version)) => {
                let key = CacheKey::new(profile.id.clone(), profile_version, catalog_version);
                self.cache.get_or_try_insert_with(key, || {
                    self.ranking.rank(&profile, catalog.list())
                })?
            }
            _ => (Arc::new(self.ranking.rank(&profile, catalog.list())?), false),
        };

        let results = filter.apply(&ranked);
        debug!(
            profile_id = %profile.id.0,
            ranked = ranked.len(),
            returned = results.len(),
            rejected = load.rejected.len(),
            cached,
            "ranking request served"
        );

        Ok(RankingReport {
            profile_id: profile.id,
            catalog_version: catalog.version().map(str::to_string),
            results,
            rejected: load.rejected,
            cached,
        })
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error("invalid profile: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
