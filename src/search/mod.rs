//! Multi-tier candidate retrieval and merge.
//!
//! Four category-partitioned searches run concurrently against the catalog;
//! the merge acts as the join barrier. A tier that errors or times out
//! degrades to an empty result and the ingredient continues. Deduplication
//! keeps the occurrence from the highest-priority tier, then the earliest
//! position.

pub mod types;


pub use types::{CandidateRecord, Tier};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use crate::catalog::CatalogClient;
use crate::constants::MAX_MERGED_CANDIDATES;

/// Issues the four tier searches and collects tagged raw candidates.
pub struct TierSearchExecutor<C> {
    catalog: Arc<C>,
    tier_timeout: Duration,
}

impl<C> std::fmt::Debug for TierSearchExecutor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierSearchExecutor")
            .field("tier_timeout", &self.tier_timeout)
            .finish_non_exhaustive()
    }
}

impl<C: CatalogClient> TierSearchExecutor<C> {
    pub fn new(catalog: Arc<C>, tier_timeout: Duration) -> Self {
        Self {
            catalog,
            tier_timeout,
        }
    }

    /// Runs all four tier searches concurrently and returns the merged,
    /// deduplicated candidate list ordered by (tier priority, position).
    #[instrument(skip(self), fields(query = query))]
    pub async fn search(&self, query: &str) -> Vec<CandidateRecord> {
        let tier_futures = Tier::ALL.map(|tier| self.search_tier(query, tier));
        let per_tier = join_all(tier_futures).await;

        let raw: Vec<CandidateRecord> = per_tier.into_iter().flatten().collect();
        let merged = merge_candidates(raw);

        debug!(candidates = merged.len(), "Tier search settled");
        merged
    }

    /// One tier's search, degraded to empty on error or timeout.
    async fn search_tier(&self, query: &str, tier: Tier) -> Vec<CandidateRecord> {
        let result = tokio::time::timeout(
            self.tier_timeout,
            self.catalog
                .search(query, tier.data_type_filter(), tier.result_cap()),
        )
        .await;

        let hits = match result {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                warn!(%tier, query, error = %e, "Tier search failed, contributing empty result");
                return Vec::new();
            }
            Err(_) => {
                warn!(%tier, query, timeout = ?self.tier_timeout, "Tier search timed out");
                return Vec::new();
            }
        };

        hits.into_iter()
            .take(tier.result_cap())
            .enumerate()
            .map(|(position, hit)| CandidateRecord {
                fdc_id: hit.fdc_id,
                description: hit.description,
                data_type: hit.data_type,
                food_category: hit.food_category,
                tier,
                position,
            })
            .collect()
    }
}

/// Deduplicates by catalog identifier, keeping the highest-priority tier's
/// occurrence (earliest position within equal tiers), then orders by tier
/// priority and original position.
pub fn merge_candidates(raw: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let mut by_id: HashMap<u64, CandidateRecord> = HashMap::with_capacity(raw.len());

    for candidate in raw {
        match by_id.get(&candidate.fdc_id) {
            Some(kept)
                if (kept.tier.priority(), kept.position)
                    <= (candidate.tier.priority(), candidate.position) => {}
            _ => {
                by_id.insert(candidate.fdc_id, candidate);
            }
        }
    }

    let mut merged: Vec<CandidateRecord> = by_id.into_values().collect();
    merged.sort_by_key(|c| (c.tier.priority(), c.position));
    merged.truncate(MAX_MERGED_CANDIDATES);
    merged
}
