//! Search query generation.
//!
//! Every attempt's query comes from the generator: attempt 1 asks the
//! oracle for the primary catalog phrasing of the ingredient, a retry asks
//! for a differently-phrased variant. If the oracle fails or repeats
//! itself, a deterministic rewrite stands in so no attempt re-runs an
//! identical search.

mod oracle;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use oracle::GenaiQueryGenerator;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockQueryGenerator;

use async_trait::async_trait;

use crate::ingredient::Ingredient;
use crate::oracle::OracleError;

/// Produces the search query for one attempt: the primary phrasing on
/// attempt 1, a fresh variant on retries.
///
/// Implementations must not return a query already present in `prior`;
/// callers pass every query used for the ingredient so far.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn variant(
        &self,
        ingredient: &Ingredient,
        attempt: u32,
        prior: &[String],
    ) -> Result<String, OracleError>;
}

/// Deterministic stand-in for an attempt's query when the oracle is
/// unavailable or unusable. Attempt 1 searches the normalized name itself;
/// retries go through [`fallback_variant`].
pub fn deterministic_query(ingredient: &Ingredient, attempt: u32, prior: &[String]) -> String {
    if attempt <= 1 {
        ingredient.normalized().to_string()
    } else {
        fallback_variant(ingredient, prior)
    }
}

/// Deterministic query rewrite used when no oracle is available or the
/// oracle repeats a prior query.
///
/// Tries, in order: reversed word order, singular/plural toggle of the main
/// word, and the name with a "raw" qualifier. Falls back to the normalized
/// name itself when everything is already taken.
pub fn fallback_variant(ingredient: &Ingredient, prior: &[String]) -> String {
    let words: Vec<&str> = ingredient.words().collect();

    let mut candidates: Vec<String> = Vec::new();
    if words.len() > 1 {
        let mut reversed = words.clone();
        reversed.reverse();
        candidates.push(reversed.join(" "));
    }
    if let Some(toggled) = toggle_plural(ingredient.main_word()) {
        let mut toggled_words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        if let Some(last) = toggled_words.last_mut() {
            *last = toggled;
        }
        candidates.push(toggled_words.join(" "));
    }
    candidates.push(format!("{} raw", ingredient.normalized()));

    candidates
        .into_iter()
        .find(|candidate| !prior.iter().any(|p| p == candidate))
        .unwrap_or_else(|| ingredient.normalized().to_string())
}

/// Naive English singular/plural toggle; good enough for search variation.
fn toggle_plural(word: &str) -> Option<String> {
    if word.len() < 3 {
        return None;
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return Some(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("es") {
        return Some(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        return Some(stem.to_string());
    }
    Some(format!("{word}s"))
}
