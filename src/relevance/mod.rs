//! Rule-based relevance ranking.
//!
//! Deterministic and offline: no catalog or oracle calls. The score is a sum
//! of bonuses and penalties around a base of 1000, tuned for single-
//! ingredient queries against catalog description conventions
//! ("Milk, whole", "Spices, pepper, black"). Ties break by tier priority,
//! then original position, so the merged order remains the tie-break source
//! rather than the final ranking.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::catalog::DataType;
use crate::ingredient::Ingredient;
use crate::search::CandidateRecord;

const BASE_SCORE: f64 = 1000.0;
const POSITION_DECAY: f64 = 10.0;
const EXACT_MATCH_BONUS: f64 = 500.0;
const STARTS_WITH_QUERY_BONUS: f64 = 300.0;
const STARTS_WITH_MAIN_WORD_BONUS: f64 = 250.0;
const PHRASE_WITH_MAIN_WORD_BONUS: f64 = 100.0;
const PHRASE_MATCH_BONUS: f64 = 200.0;
const ALL_WORDS_BONUS: f64 = 150.0;
const PER_WORD_BONUS: f64 = 30.0;
const COMPOUND_LEAD_PENALTY: f64 = 800.0;
const COMPOUND_ANYWHERE_PENALTY: f64 = 500.0;
const PROCESSED_FORM_PENALTY: f64 = 300.0;
const LONG_DESCRIPTION_PENALTY: f64 = 150.0;
const CATEGORY_AFFINITY_BONUS: f64 = 50.0;

/// Descriptions leading with one of these name a food *made from* the
/// ingredient, not the ingredient itself.
const COMPOUND_INDICATORS: &[&str] = &[
    "cheese", "crackers", "bread", "cookies", "cake", "soup", "sauce", "dressing", "cereal",
    "bar", "drink", "juice", "spread", "butter", "yogurt",
];

/// Preserved/processed forms penalized when the query does not ask for them.
const PROCESSED_FORMS: &[&str] = &[
    "dry",
    "powdered",
    "powder",
    "dehydrated",
    "canned",
    "frozen",
    "concentrated",
    "evaporated",
    "condensed",
];

/// A candidate with its relevance rank attached. Not persisted beyond a
/// single resolution run.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub candidate: CandidateRecord,
    pub relevance: f64,
}

/// Scores and sorts the merged candidate list, best first.
pub fn rank_candidates(
    candidates: Vec<CandidateRecord>,
    ingredient: &Ingredient,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| {
            let relevance = score_candidate(&candidate, ingredient, position);
            RankedCandidate {
                candidate,
                relevance,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.tier.priority().cmp(&b.candidate.tier.priority()))
            .then_with(|| a.candidate.position.cmp(&b.candidate.position))
    });

    ranked
}

/// Relevance of one candidate; `position` is its index in the merged order.
pub fn score_candidate(
    candidate: &CandidateRecord,
    ingredient: &Ingredient,
    position: usize,
) -> f64 {
    let description = candidate.description.to_lowercase();
    let query = ingredient.normalized();
    let query_words: HashSet<&str> = ingredient.words().collect();

    let mut score = BASE_SCORE;

    // Merged order already encodes tier priority + catalog relevance.
    score -= position as f64 * POSITION_DECAY;

    let main_word = ingredient.main_word();
    if description == query {
        score += EXACT_MATCH_BONUS;
    } else if description.starts_with(query) {
        score += STARTS_WITH_QUERY_BONUS;
    } else if !main_word.is_empty() && description.starts_with(main_word) {
        // "Milk, whole" for query "whole milk".
        score += STARTS_WITH_MAIN_WORD_BONUS;
        if description.contains(query) {
            score += PHRASE_WITH_MAIN_WORD_BONUS;
        }
    } else if description.contains(query) {
        score += PHRASE_MATCH_BONUS;
    }

    let desc_words: Vec<String> = description
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let desc_word_set: HashSet<&str> = desc_words.iter().map(String::as_str).collect();

    let matching = query_words.intersection(&desc_word_set).count();
    if matching > 0 {
        if matching == query_words.len() {
            score += ALL_WORDS_BONUS;
        } else {
            score += matching as f64 * PER_WORD_BONUS;
        }
    }

    // Compound-dish and processed-form penalties only apply to short,
    // typically single-ingredient queries.
    if query_words.len() <= 2 {
        let first_word = desc_words.first().map(String::as_str).unwrap_or("");
        if COMPOUND_INDICATORS.contains(&first_word) {
            score -= COMPOUND_LEAD_PENALTY;
        } else if COMPOUND_INDICATORS.iter().any(|i| description.contains(i)) {
            score -= COMPOUND_ANYWHERE_PENALTY;
        }

        let query_names_form = PROCESSED_FORMS.iter().any(|f| query.contains(f));
        if !query_names_form && PROCESSED_FORMS.iter().any(|f| description.contains(f)) {
            score -= PROCESSED_FORM_PENALTY;
        }

        if desc_words.len() > query_words.len() + 1 {
            score -= LONG_DESCRIPTION_PENALTY;
        }
    }

    score += data_type_weight(&candidate.data_type);
    score += category_affinity(query, candidate.food_category.as_deref());

    score
}

/// Generic/reference data types outrank prepared and branded ones.
fn data_type_weight(data_type: &DataType) -> f64 {
    match data_type {
        DataType::Foundation => 100.0,
        DataType::SrLegacy => 50.0,
        DataType::Survey => 25.0,
        DataType::Branded => -50.0,
        DataType::Other(_) => 0.0,
    }
}

fn category_affinity(query: &str, category: Option<&str>) -> f64 {
    let Some(category) = category else {
        return 0.0;
    };
    let category = category.to_lowercase();

    if query.contains("milk") && category.contains("dairy") {
        return CATEGORY_AFFINITY_BONUS;
    }
    if query.contains("fruit") && category.contains("fruit") {
        return CATEGORY_AFFINITY_BONUS;
    }
    0.0
}
