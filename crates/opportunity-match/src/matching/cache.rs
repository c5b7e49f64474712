use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::domain::ProfileId;
use super::ranking::RankedResult;

/// Identity of a cached ranking. Both version tokens are mandatory: a ranking may only be reused
/// for the exact profile and catalog revisions it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub profile_id: ProfileId,
    pub profile_version: String,
    pub catalog_version: String,
}

impl CacheKey {
    pub fn new(
        profile_id: ProfileId,
        profile_version: impl Into<String>,
        catalog_version: impl Into<String>,
    ) -> Self {
        Self {
            profile_id,
            profile_version: profile_version.into(),
            catalog_version: catalog_version.into(),
        }
    }
}

/// Bounded memo of unfiltered rankings. Cleared wholesale once `capacity` is reached.
#[derive(Debug)]
pub struct RankingCache {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Arc<Vec<RankedResult>>>>,
}

impl RankingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Vec<RankedResult>>> {
        self.lock().get(key).cloned()
    }

    /// Return the cached ranking for `key`, computing and storing it on a miss.
    ///
    /// The computation runs without holding the lock, so concurrent misses for one key may both
    /// compute; they produce identical rankings. The flag reports whether the entry was a hit.
    pub fn get_or_try_insert_with<E, F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<(Arc<Vec<RankedResult>>, bool), E>
    where
        F: FnOnce() -> Result<Vec<RankedResult>, E>,
    {
        if let Some(hit) = self.get(&key) {
            debug!(
                profile_id = %key.profile_id.0,
                catalog_version = %key.catalog_version,
                "ranking cache hit"
            );
            return Ok((hit, true));
        }

        let ranked = Arc::new(compute()?);
        if self.capacity == 0 {
            return Ok((ranked, false));
        }

        let mut entries = self.lock();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            debug!(evicted = entries.len(), "ranking cache full, clearing");
            entries.clear();
        }
        entries.insert(key, Arc::clone(&ranked));
        Ok((ranked, false))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<Vec<RankedResult>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
