//! Confidence-gated decision rules.
//!
//! The only place `Flag` and `MappingStatus` are ever produced. Both passes
//! are ordered `(predicate, outcome)` tables evaluated top-down, first match
//! wins, so every threshold is auditable in one screen of code.


use serde::Serialize;

use crate::constants::{
    NUTRITIONAL_HIGH_THRESHOLD, NUTRITIONAL_IDENTICAL_THRESHOLD, NUTRITIONAL_MID_THRESHOLD,
    SEMANTIC_HIGH_THRESHOLD, SEMANTIC_LOW_THRESHOLD, SEMANTIC_MID_THRESHOLD,
};

/// Confidence flag carried on every mapping result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Flag {
    #[serde(rename = "HIGH_CONFIDENCE")]
    HighConfidence,
    #[serde(rename = "MID_CONFIDENCE")]
    MidConfidence,
    #[serde(rename = "LOW_CONFIDENCE")]
    LowConfidence,
    #[serde(rename = "NO_MAPPING_FOUND")]
    NoMappingFound,
}

/// Why the mapping ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStatus {
    /// Semantic ≥ 90, accepted without the nutritional stage.
    SearchVerifiedSemanticHigh,
    /// Semantic 80-89 with nutritional ≥ 90.
    SearchVerifiedHigh,
    /// Semantic 80-89 with nutritional 80-89.
    SearchVerifiedMid,
    /// Semantic 65-79 rescued by nutritional ≥ 90.
    SearchVerifiedMidSemanticLow,
    /// Semantic below 65 but profiles near-identical (diagnostic pass only).
    NutritionallyIdenticalLowSemantic,
    /// Best semantic score below 65.
    SemanticScoreTooLow,
    /// Semantic band needed nutritional confirmation and did not get it.
    NutritionalMismatch,
    /// All four tiers came back empty.
    NoSearchResults,
    /// Candidates existed but none survived semantic filtering.
    NoSemanticSurvivors,
    /// Detail fetch failed for every retained candidate.
    DetailFetchFailed,
    /// The ingredient exceeded its processing budget.
    IngredientTimeout,
}

/// First-pass outcome from the best semantic verdict alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOutcome {
    /// Accept now; nutritional stage skipped.
    Accept { flag: Flag, status: MappingStatus },
    /// Run the nutritional stage; acceptance needs at least this similarity.
    NeedsNutrition { required: f64 },
    /// Reject; nutritional stage skipped.
    Reject { status: MappingStatus },
}

/// Semantic gate, evaluated against the best retained verdict.
pub fn semantic_gate(semantic: f64) -> GateOutcome {
    const RULES: &[(fn(f64) -> bool, GateOutcome)] = &[
        (
            |s| s >= SEMANTIC_HIGH_THRESHOLD,
            GateOutcome::Accept {
                flag: Flag::HighConfidence,
                status: MappingStatus::SearchVerifiedSemanticHigh,
            },
        ),
        (
            |s| s >= SEMANTIC_MID_THRESHOLD,
            GateOutcome::NeedsNutrition {
                required: NUTRITIONAL_MID_THRESHOLD,
            },
        ),
        (
            |s| s >= SEMANTIC_LOW_THRESHOLD,
            GateOutcome::NeedsNutrition {
                required: NUTRITIONAL_HIGH_THRESHOLD,
            },
        ),
        (
            |_| true,
            GateOutcome::Reject {
                status: MappingStatus::SemanticScoreTooLow,
            },
        ),
    ];

    for (predicate, outcome) in RULES {
        if predicate(semantic) {
            return *outcome;
        }
    }
    unreachable!("gate rules end in a catch-all")
}

/// Final decision once both scores are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted { flag: Flag, status: MappingStatus },
    Rejected { status: MappingStatus },
}

/// Second pass: combines the semantic band with the nutritional score.
///
/// `nutritional` is `None` when the stage never ran; rules that need it
/// simply do not match. The near-identical-profile rescue sits first so it
/// wins whenever a diagnostic nutritional pass produced a score for a
/// below-gate semantic verdict.
pub fn final_decision(semantic: f64, nutritional: Option<f64>) -> Decision {
    type Predicate = fn(f64, Option<f64>) -> bool;
    const RULES: &[(Predicate, Decision)] = &[
        (
            |s, n| s < SEMANTIC_LOW_THRESHOLD && at_least(n, NUTRITIONAL_IDENTICAL_THRESHOLD),
            Decision::Accepted {
                flag: Flag::LowConfidence,
                status: MappingStatus::NutritionallyIdenticalLowSemantic,
            },
        ),
        (
            |s, _| s >= SEMANTIC_HIGH_THRESHOLD,
            Decision::Accepted {
                flag: Flag::HighConfidence,
                status: MappingStatus::SearchVerifiedSemanticHigh,
            },
        ),
        (
            |s, n| s >= SEMANTIC_MID_THRESHOLD && at_least(n, NUTRITIONAL_HIGH_THRESHOLD),
            Decision::Accepted {
                flag: Flag::HighConfidence,
                status: MappingStatus::SearchVerifiedHigh,
            },
        ),
        (
            |s, n| s >= SEMANTIC_MID_THRESHOLD && at_least(n, NUTRITIONAL_MID_THRESHOLD),
            Decision::Accepted {
                flag: Flag::MidConfidence,
                status: MappingStatus::SearchVerifiedMid,
            },
        ),
        (
            |s, n| s >= SEMANTIC_LOW_THRESHOLD && at_least(n, NUTRITIONAL_HIGH_THRESHOLD),
            Decision::Accepted {
                flag: Flag::MidConfidence,
                status: MappingStatus::SearchVerifiedMidSemanticLow,
            },
        ),
        (
            |s, _| s >= SEMANTIC_LOW_THRESHOLD,
            Decision::Rejected {
                status: MappingStatus::NutritionalMismatch,
            },
        ),
        (
            |_, _| true,
            Decision::Rejected {
                status: MappingStatus::SemanticScoreTooLow,
            },
        ),
    ];

    for (predicate, decision) in RULES {
        if predicate(semantic, nutritional) {
            return *decision;
        }
    }
    unreachable!("final rules end in a catch-all")
}

fn at_least(score: Option<f64>, threshold: f64) -> bool {
    score.is_some_and(|s| s >= threshold)
}
