//! Orchestration: the per-ingredient resolution chain, bounded retry, and
//! the batch runner.
//!
//! The chain is a straight composition of the stage modules: query, tier
//! search, merge, relevance ranking, semantic verification, decision,
//! conditional nutritional verification, final decision, extraction. The
//! resolver owns no decision logic of its own; `flag`/`mapping_status` come
//! exclusively from the decision tables.

mod error;
mod result;


pub use error::PipelineError;
pub use result::{ChosenRecord, MappingResult};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use tracing::{debug, info, instrument, warn};

use crate::cache::RunCache;
use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::constants::MAX_ATTEMPTS;
use crate::decision::{Decision, Flag, GateOutcome, MappingStatus, final_decision, semantic_gate};
use crate::ingredient::Ingredient;
use crate::nutrition::{NutritionOracle, NutritionReport, NutritionalSimilarityScorer};
use crate::querygen::{QueryGenerator, deterministic_query};
use crate::relevance::rank_candidates;
use crate::search::TierSearchExecutor;
use crate::semantic::{SemanticOracle, SemanticVerifier, VerifiedCandidate};

/// One attempt's outcome, before retry bookkeeping.
enum AttemptOutcome {
    Accepted {
        flag: Flag,
        status: MappingStatus,
        chosen: ChosenRecord,
        semantic_score: Option<f64>,
        nutritional_score: Option<f64>,
        reason: String,
    },
    Rejected {
        status: MappingStatus,
        semantic_score: Option<f64>,
        nutritional_score: Option<f64>,
        reason: String,
    },
}

/// Single-ingredient resolution chain with bounded retry.
pub struct Resolver<C, S, N, Q> {
    searcher: TierSearchExecutor<C>,
    semantic: SemanticVerifier<S>,
    nutrition: NutritionalSimilarityScorer<N, C>,
    catalog: Arc<C>,
    querygen: Arc<Q>,
    cache: RunCache,
    diagnostic_nutrition_pass: bool,
}

impl<C, S, N, Q> Resolver<C, S, N, Q>
where
    C: CatalogClient,
    S: SemanticOracle,
    N: NutritionOracle,
    Q: QueryGenerator,
{
    pub fn new(
        catalog: Arc<C>,
        semantic_oracle: Arc<S>,
        nutrition_oracle: Arc<N>,
        querygen: Arc<Q>,
        cache: RunCache,
        config: &Config,
    ) -> Self {
        Self {
            searcher: TierSearchExecutor::new(Arc::clone(&catalog), config.tier_timeout),
            semantic: SemanticVerifier::new(
                semantic_oracle,
                cache.clone(),
                config.semantic_candidate_cap,
                config.oracle_concurrency,
            ),
            nutrition: NutritionalSimilarityScorer::new(
                nutrition_oracle,
                Arc::clone(&catalog),
                cache.clone(),
            ),
            catalog,
            querygen,
            cache,
            diagnostic_nutrition_pass: config.diagnostic_nutrition_pass,
        }
    }

    /// Resolves one ingredient to its terminal [`MappingResult`].
    #[instrument(skip(self), fields(ingredient = %ingredient.normalized()))]
    pub async fn resolve(&self, ingredient: &Ingredient) -> MappingResult {
        let mut queries: Vec<String> = Vec::new();
        let mut reasons: Vec<String> = Vec::new();
        let mut last_status = MappingStatus::NoSearchResults;
        let mut last_semantic = None;
        let mut last_nutritional = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let query = self.query_for(ingredient, attempt, &queries).await;
            debug!(attempt, %query, "attempt starting");
            queries.push(query.clone());

            match self.attempt(ingredient, &query).await {
                AttemptOutcome::Accepted {
                    flag,
                    status,
                    chosen,
                    semantic_score,
                    nutritional_score,
                    reason,
                } => {
                    info!(
                        attempt,
                        fdc_id = chosen.fdc_id,
                        ?flag,
                        ?status,
                        "ingredient mapped"
                    );
                    reasons.push(format!("attempt {attempt}: {reason}"));
                    return MappingResult {
                        ingredient: ingredient.name().to_string(),
                        chosen: Some(chosen),
                        flag,
                        mapping_status: status,
                        semantic_score,
                        nutritional_score,
                        attempt_count: attempt,
                        queries,
                        reasoning: reasons.join("; "),
                        timestamp: Utc::now(),
                    };
                }
                AttemptOutcome::Rejected {
                    status,
                    semantic_score,
                    nutritional_score,
                    reason,
                } => {
                    debug!(attempt, ?status, %reason, "attempt rejected");
                    reasons.push(format!("attempt {attempt}: {reason}"));
                    last_status = status;
                    last_semantic = semantic_score;
                    last_nutritional = nutritional_score;
                }
            }
        }

        info!(?last_status, "retries exhausted");
        MappingResult {
            ingredient: ingredient.name().to_string(),
            chosen: None,
            flag: Flag::NoMappingFound,
            mapping_status: last_status,
            semantic_score: last_semantic,
            nutritional_score: last_nutritional,
            attempt_count: MAX_ATTEMPTS,
            queries,
            reasoning: reasons.join("; "),
            timestamp: Utc::now(),
        }
    }

    /// Query for this attempt, obtained from the generator: the primary
    /// phrasing on attempt 1, a variant on retries. Cached per
    /// `(ingredient, attempt)` so a concurrent re-resolution of the same
    /// ingredient reuses it.
    async fn query_for(&self, ingredient: &Ingredient, attempt: u32, prior: &[String]) -> String {
        let key = (ingredient.normalized().to_string(), attempt);
        match self
            .cache
            .query_or_try_insert_with(key, self.querygen.variant(ingredient, attempt, prior))
            .await
        {
            Ok(query) => query,
            Err(err) => {
                warn!(attempt, error = %err, "query generator failed, using deterministic query");
                deterministic_query(ingredient, attempt, prior)
            }
        }
    }

    /// One full pass of the chain for one query.
    async fn attempt(&self, ingredient: &Ingredient, query: &str) -> AttemptOutcome {
        let merged = self.searcher.search(query).await;
        if merged.is_empty() {
            return AttemptOutcome::Rejected {
                status: MappingStatus::NoSearchResults,
                semantic_score: None,
                nutritional_score: None,
                reason: format!("no catalog results for '{query}'"),
            };
        }

        let ranked = rank_candidates(merged, ingredient);
        let retained = self.semantic.verify(ingredient, &ranked).await;
        let Some(best) = retained.first() else {
            return AttemptOutcome::Rejected {
                status: MappingStatus::NoSemanticSurvivors,
                semantic_score: None,
                nutritional_score: None,
                reason: "no candidate survived semantic filtering".to_string(),
            };
        };
        let best_semantic = best.verdict.score;

        match semantic_gate(best_semantic) {
            GateOutcome::Accept { flag, status } => match self.extract(&retained).await {
                Some(chosen) => AttemptOutcome::Accepted {
                    flag,
                    status,
                    semantic_score: Some(best_semantic),
                    nutritional_score: None,
                    reason: format!(
                        "semantic {best_semantic:.1} accepted without nutritional stage: {}",
                        best.verdict.reasoning
                    ),
                    chosen,
                },
                None => AttemptOutcome::Rejected {
                    status: MappingStatus::DetailFetchFailed,
                    semantic_score: Some(best_semantic),
                    nutritional_score: None,
                    reason: "detail fetch failed for every retained candidate".to_string(),
                },
            },
            GateOutcome::NeedsNutrition { required } => {
                self.nutrition_pass(ingredient, &retained, best_semantic, required)
                    .await
            }
            GateOutcome::Reject { status } => {
                if self.diagnostic_nutrition_pass {
                    // Diagnostic-only pass; the near-identical rule in the
                    // final table is the one way it can change the outcome.
                    return self
                        .nutrition_pass(
                            ingredient,
                            &retained,
                            best_semantic,
                            crate::constants::NUTRITIONAL_IDENTICAL_THRESHOLD,
                        )
                        .await;
                }
                AttemptOutcome::Rejected {
                    status,
                    semantic_score: Some(best_semantic),
                    nutritional_score: None,
                    reason: format!(
                        "best semantic score {best_semantic:.1} below acceptance floor"
                    ),
                }
            }
        }
    }

    /// Nutritional stage plus the final decision table.
    async fn nutrition_pass(
        &self,
        ingredient: &Ingredient,
        retained: &[VerifiedCandidate],
        best_semantic: f64,
        required: f64,
    ) -> AttemptOutcome {
        let report: NutritionReport = match self.nutrition.assess(ingredient, retained).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "nutritional stage unavailable");
                return AttemptOutcome::Rejected {
                    status: MappingStatus::NutritionalMismatch,
                    semantic_score: Some(best_semantic),
                    nutritional_score: None,
                    reason: format!("expected nutrient profile unavailable: {err}"),
                };
            }
        };

        let Some(assessment) = report.best() else {
            return if report.fetch_failures > 0 {
                AttemptOutcome::Rejected {
                    status: MappingStatus::DetailFetchFailed,
                    semantic_score: Some(best_semantic),
                    nutritional_score: None,
                    reason: "detail fetch failed for every retained candidate".to_string(),
                }
            } else {
                AttemptOutcome::Rejected {
                    status: MappingStatus::NutritionalMismatch,
                    semantic_score: Some(best_semantic),
                    nutritional_score: None,
                    reason: "no candidate profile could be scored".to_string(),
                }
            };
        };
        let best_nutritional = assessment.verdict.similarity;

        match final_decision(best_semantic, Some(best_nutritional)) {
            Decision::Accepted { flag, status } => {
                // The nutrition-best candidate is the one carried forward;
                // its profile was already fetched during scoring.
                let verified = retained
                    .iter()
                    .find(|v| v.candidate.fdc_id == assessment.fdc_id)
                    .unwrap_or(&retained[0]);
                AttemptOutcome::Accepted {
                    flag,
                    status,
                    chosen: ChosenRecord {
                        fdc_id: verified.candidate.fdc_id,
                        description: verified.candidate.description.clone(),
                        data_type: verified.candidate.data_type.clone(),
                        food_category: verified.candidate.food_category.clone(),
                        profile: assessment.profile.clone(),
                    },
                    semantic_score: Some(best_semantic),
                    nutritional_score: Some(best_nutritional),
                    reason: format!(
                        "semantic {best_semantic:.1}, nutritional {best_nutritional:.1} \
                         (required {required:.1}): {}",
                        assessment.verdict.reasoning
                    ),
                }
            }
            Decision::Rejected { status } => AttemptOutcome::Rejected {
                status,
                semantic_score: Some(best_semantic),
                nutritional_score: Some(best_nutritional),
                reason: format!(
                    "nutritional {best_nutritional:.1} below required {required:.1} \
                     for semantic band {best_semantic:.1}"
                ),
            },
        }
    }

    /// Fetches the accepted candidate's full record, falling through to the
    /// next-best retained candidate when a fetch fails.
    async fn extract(&self, retained: &[VerifiedCandidate]) -> Option<ChosenRecord> {
        for verified in retained {
            match self.catalog.detail(verified.candidate.fdc_id).await {
                Ok(detail) => {
                    return Some(ChosenRecord {
                        fdc_id: verified.candidate.fdc_id,
                        description: verified.candidate.description.clone(),
                        data_type: verified.candidate.data_type.clone(),
                        food_category: verified.candidate.food_category.clone(),
                        profile: crate::nutrition::NutrientProfile::from_detail(&detail),
                    });
                }
                Err(err) => {
                    warn!(
                        fdc_id = verified.candidate.fdc_id,
                        error = %err,
                        "extraction fetch failed, trying next retained candidate"
                    );
                }
            }
        }
        None
    }
}

/// Resolves a batch with a bounded worker pool and a per-ingredient budget.
///
/// Results come back in input order. A budget expiry terminates that
/// ingredient with a timeout result; it never aborts the batch.
pub async fn run_batch<C, S, N, Q>(
    resolver: Arc<Resolver<C, S, N, Q>>,
    ingredients: &[String],
    concurrency: usize,
    budget: Duration,
) -> Result<Vec<MappingResult>, PipelineError>
where
    C: CatalogClient + 'static,
    S: SemanticOracle + 'static,
    N: NutritionOracle + 'static,
    Q: QueryGenerator + 'static,
{
    if ingredients.is_empty() {
        return Err(PipelineError::EmptyIngredientList);
    }
    if let Some(position) = ingredients.iter().position(|name| name.trim().is_empty()) {
        return Err(PipelineError::BlankIngredient { position });
    }

    let run_id = uuid::Uuid::new_v4();
    info!(
        %run_id,
        ingredients = ingredients.len(),
        concurrency,
        budget_secs = budget.as_secs(),
        "batch starting"
    );

    let results = futures_util::stream::iter(ingredients.iter().cloned())
        .map(|name| {
            let resolver = Arc::clone(&resolver);
            async move {
                let ingredient = Ingredient::new(name.clone());
                match tokio::time::timeout(budget, resolver.resolve(&ingredient)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(ingredient = %name, "processing budget exceeded");
                        MappingResult::timed_out(&name, budget.as_secs())
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(results)
}
