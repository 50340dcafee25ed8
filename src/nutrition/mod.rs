//! Nutritional verification.
//!
//! The second oracle pass: fetch full catalog records for the candidates the
//! semantic pass retained, compare their nutrient profiles against what the
//! ingredient should contain, and score the agreement. Only invoked when the
//! semantic score alone cannot settle the mapping.

mod oracle;
mod profile;
mod similarity;

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

pub use oracle::{GenaiNutritionOracle, NutritionOracle};
pub use profile::{Measurement, Nutrient, NutrientGroup, NutrientProfile};
pub use similarity::profile_similarity;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockNutritionOracle;

use crate::cache::RunCache;
use crate::catalog::CatalogClient;
use crate::ingredient::Ingredient;
use crate::oracle::OracleError;
use crate::semantic::VerifiedCandidate;

/// Nutritional agreement for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionalVerdict {
    pub fdc_id: u64,
    /// 0-100 weighted profile similarity.
    pub similarity: f64,
    pub reasoning: String,
}

/// A candidate with its fetched profile and similarity verdict.
#[derive(Debug, Clone)]
pub struct NutritionalAssessment {
    pub fdc_id: u64,
    pub verdict: NutritionalVerdict,
    /// Actual per-100g profile from the catalog record.
    pub profile: NutrientProfile,
}

/// Outcome of the nutritional pass over a retained-candidate set.
#[derive(Debug, Clone, Default)]
pub struct NutritionReport {
    /// Successful assessments, best similarity first.
    pub assessments: Vec<NutritionalAssessment>,
    /// Candidates whose catalog detail could not be fetched.
    pub fetch_failures: usize,
}

impl NutritionReport {
    pub fn best(&self) -> Option<&NutritionalAssessment> {
        self.assessments.first()
    }
}

/// Scores retained candidates against an oracle-supplied expected profile.
pub struct NutritionalSimilarityScorer<O, C> {
    oracle: Arc<O>,
    catalog: Arc<C>,
    cache: RunCache,
}

impl<O, C> NutritionalSimilarityScorer<O, C>
where
    O: NutritionOracle,
    C: CatalogClient,
{
    pub fn new(oracle: Arc<O>, catalog: Arc<C>, cache: RunCache) -> Self {
        Self {
            oracle,
            catalog,
            cache,
        }
    }

    /// Fetches each candidate's full record and scores its profile against
    /// the expected one. The expected profile is cached per ingredient for
    /// the run, so a retry attempt reuses it. Per-candidate fetch failures
    /// are skipped and counted; an oracle failure fails the whole pass since
    /// nothing can be scored without the expected profile.
    pub async fn assess(
        &self,
        ingredient: &Ingredient,
        candidates: &[VerifiedCandidate],
    ) -> Result<NutritionReport, OracleError> {
        let oracle = Arc::clone(&self.oracle);
        let ingredient_owned = ingredient.clone();
        let expected = self
            .cache
            .profile_or_try_insert_with(ingredient.normalized().to_string(), async move {
                oracle.expected_profile(&ingredient_owned).await
            })
            .await
            .map_err(|e| (*e).clone())?;

        let mut report = NutritionReport::default();
        for verified in candidates {
            let fdc_id = verified.candidate.fdc_id;
            let detail = match self.catalog.detail(fdc_id).await {
                Ok(detail) => detail,
                Err(err) => {
                    warn!(fdc_id, error = %err, "detail fetch failed, skipping candidate");
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let profile = NutrientProfile::from_detail(&detail);
            let (similarity, reasoning) = profile_similarity(&expected, &profile);
            debug!(
                ingredient = %ingredient.normalized(),
                fdc_id,
                similarity,
                "nutritional similarity scored"
            );

            report.assessments.push(NutritionalAssessment {
                fdc_id,
                verdict: NutritionalVerdict {
                    fdc_id,
                    similarity,
                    reasoning,
                },
                profile,
            });
        }

        report.assessments.sort_by(|a, b| {
            b.verdict
                .similarity
                .partial_cmp(&a.verdict.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(report)
    }
}
