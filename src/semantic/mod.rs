//! Semantic verification of ranked candidates.
//!
//! Each candidate is scored for meaning-equivalence to the ingredient by an
//! external oracle at deterministic settings. Scores are cached by
//! `(ingredient, fdc_id)` for the run, so a retry that re-encounters a
//! candidate decides identically without a second oracle call. Oracle
//! failures leave a candidate without a verdict; they never fail the
//! ingredient.

pub mod oracle;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use oracle::{GenaiSemanticOracle, SemanticJudgement, SemanticOracle};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockSemanticOracle;

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, instrument, warn};

use crate::cache::RunCache;
use crate::constants::{SEMANTIC_FILTER_FLOOR, SEMANTIC_RETAIN_COUNT};
use crate::ingredient::Ingredient;
use crate::relevance::RankedCandidate;
use crate::search::CandidateRecord;

/// Oracle-assigned meaning-equivalence verdict, cached per run.
#[derive(Debug, Clone)]
pub struct SemanticVerdict {
    pub ingredient: String,
    pub fdc_id: u64,
    /// 0-100; 90+ exact or trivial variant, 80-89 same substance different
    /// form, 65-79 related-but-acceptable, below 50 rejected.
    pub score: f64,
    pub reasoning: String,
}

/// A candidate that survived semantic filtering.
#[derive(Debug, Clone)]
pub struct VerifiedCandidate {
    pub candidate: CandidateRecord,
    pub relevance: f64,
    pub verdict: SemanticVerdict,
}

/// Scores candidates through the cache, filters, and retains the top 3.
pub struct SemanticVerifier<O> {
    oracle: Arc<O>,
    cache: RunCache,
    candidate_cap: usize,
    oracle_concurrency: usize,
}

impl<O> std::fmt::Debug for SemanticVerifier<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticVerifier")
            .field("candidate_cap", &self.candidate_cap)
            .field("oracle_concurrency", &self.oracle_concurrency)
            .finish_non_exhaustive()
    }
}

impl<O: SemanticOracle> SemanticVerifier<O> {
    pub fn new(
        oracle: Arc<O>,
        cache: RunCache,
        candidate_cap: usize,
        oracle_concurrency: usize,
    ) -> Self {
        Self {
            oracle,
            cache,
            candidate_cap,
            oracle_concurrency: oracle_concurrency.max(1),
        }
    }

    /// Verifies the scored list: caches/queries a verdict per candidate,
    /// drops scores below the floor, and keeps the best three (ties broken
    /// by relevance rank).
    #[instrument(skip(self, ranked), fields(ingredient = %ingredient, candidates = ranked.len()))]
    pub async fn verify(
        &self,
        ingredient: &Ingredient,
        ranked: &[RankedCandidate],
    ) -> Vec<VerifiedCandidate> {
        let mut verified: Vec<VerifiedCandidate> =
            futures_util::stream::iter(ranked.iter().take(self.candidate_cap))
                .map(|entry| self.verdict_for(ingredient, entry))
                .buffer_unordered(self.oracle_concurrency)
                .filter_map(|v| async move { v })
                .collect()
                .await;

        verified.retain(|v| v.verdict.score >= SEMANTIC_FILTER_FLOOR);
        verified.sort_by(|a, b| {
            b.verdict
                .score
                .partial_cmp(&a.verdict.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.relevance
                        .partial_cmp(&a.relevance)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        verified.truncate(SEMANTIC_RETAIN_COUNT);

        debug!(retained = verified.len(), "Semantic verification settled");
        verified
    }

    async fn verdict_for(
        &self,
        ingredient: &Ingredient,
        entry: &RankedCandidate,
    ) -> Option<VerifiedCandidate> {
        let key = (
            ingredient.normalized().to_string(),
            entry.candidate.fdc_id,
        );

        let oracle = Arc::clone(&self.oracle);
        let ingredient_owned = ingredient.clone();
        let description = entry.candidate.description.clone();
        let fdc_id = entry.candidate.fdc_id;

        let result = self
            .cache
            .verdict_or_try_insert_with(key, async move {
                let judgement = oracle.score_match(&ingredient_owned, &description).await?;
                Ok::<_, crate::oracle::OracleError>(SemanticVerdict {
                    ingredient: ingredient_owned.normalized().to_string(),
                    fdc_id,
                    score: judgement.score.clamp(0.0, 100.0),
                    reasoning: judgement.reasoning,
                })
            })
            .await;

        match result {
            Ok(verdict) => Some(VerifiedCandidate {
                candidate: entry.candidate.clone(),
                relevance: entry.relevance,
                verdict,
            }),
            Err(e) => {
                warn!(
                    ingredient = %ingredient,
                    fdc_id = entry.candidate.fdc_id,
                    error = %e,
                    "Semantic oracle failed, candidate has no verdict"
                );
                None
            }
        }
    }
}
