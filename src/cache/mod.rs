//! Run-scoped caches for semantic verdicts, generated queries, and expected
//! nutrient profiles.
//!
//! Constructed once per pipeline run and injected; never ambient global
//! state. Entries are write-once for the life of the run: population goes
//! through `try_get_with`, whose single-flight semantics collapse a
//! concurrent read-check-write race to exactly one oracle call per key,
//! with late readers awaiting the first caller's result.

#[cfg(test)]
mod tests;

use moka::future::Cache;

use crate::nutrition::NutrientProfile;
use crate::semantic::SemanticVerdict;

/// Key for cached semantic verdicts: (normalized ingredient, catalog id).
pub type VerdictKey = (String, u64);

/// Key for cached generated queries: (normalized ingredient, attempt index).
pub type QueryKey = (String, u32);

/// Key for cached expected profiles: the normalized ingredient.
pub type ProfileKey = String;

/// Per-run verdict, query, and expected-profile store.
#[derive(Clone)]
pub struct RunCache {
    verdicts: Cache<VerdictKey, SemanticVerdict>,
    queries: Cache<QueryKey, String>,
    profiles: Cache<ProfileKey, NutrientProfile>,
}

impl std::fmt::Debug for RunCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunCache")
            .field("verdicts", &self.verdicts.entry_count())
            .field("queries", &self.queries.entry_count())
            .field("profiles", &self.profiles.entry_count())
            .finish()
    }
}

impl RunCache {
    const DEFAULT_CAPACITY: u64 = 10_000;

    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache bounded to `capacity` verdict entries.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            verdicts: Cache::builder().max_capacity(capacity).build(),
            queries: Cache::builder().max_capacity(capacity).build(),
            profiles: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the cached verdict for `key`, or populates it with `init`.
    ///
    /// Concurrent callers for the same key share one `init` execution; an
    /// `init` error is returned to every waiter and nothing is cached, so a
    /// later attempt may retry.
    pub async fn verdict_or_try_insert_with<F, E>(
        &self,
        key: VerdictKey,
        init: F,
    ) -> Result<SemanticVerdict, std::sync::Arc<E>>
    where
        F: Future<Output = Result<SemanticVerdict, E>>,
        E: Send + Sync + 'static,
    {
        self.verdicts.try_get_with(key, init).await
    }

    /// Reads a verdict without populating.
    pub async fn peek_verdict(&self, key: &VerdictKey) -> Option<SemanticVerdict> {
        self.verdicts.get(key).await
    }

    /// Returns the cached query for `key`, or populates it with `init`.
    pub async fn query_or_try_insert_with<F, E>(
        &self,
        key: QueryKey,
        init: F,
    ) -> Result<String, std::sync::Arc<E>>
    where
        F: Future<Output = Result<String, E>>,
        E: Send + Sync + 'static,
    {
        self.queries.try_get_with(key, init).await
    }

    /// Reads a generated query without populating.
    pub async fn peek_query(&self, key: &QueryKey) -> Option<String> {
        self.queries.get(key).await
    }

    /// Returns the cached expected profile for `key`, or populates it with
    /// `init`.
    pub async fn profile_or_try_insert_with<F, E>(
        &self,
        key: ProfileKey,
        init: F,
    ) -> Result<NutrientProfile, std::sync::Arc<E>>
    where
        F: Future<Output = Result<NutrientProfile, E>>,
        E: Send + Sync + 'static,
    {
        self.profiles.try_get_with(key, init).await
    }

    /// Reads an expected profile without populating.
    pub async fn peek_profile(&self, key: &ProfileKey) -> Option<NutrientProfile> {
        self.profiles.get(key).await
    }
}

impl Default for RunCache {
    fn default() -> Self {
        Self::new()
    }
}
