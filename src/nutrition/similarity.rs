//! Weighted nutrient-profile similarity.
//!
//! The composite weighs macros at 40%, micros at 30%, and the remaining
//! tracked nutrients at 30%, with each group's share spread evenly over the
//! nutrients present in BOTH profiles. Groups with no shared nutrients drop
//! out and the remaining weight renormalizes, so a sparse branded record is
//! judged only on what it reports.

use crate::constants::{
    MACRO_WEIGHT_SHARE, MICRO_WEIGHT_SHARE, NUTRIENT_DIFF_CAP, REMAINDER_WEIGHT_SHARE,
};
use crate::nutrition::profile::{Nutrient, NutrientGroup, NutrientProfile};

/// How many nutrient-level differences the reasoning text names.
const REASONING_DIFF_LIMIT: usize = 3;

/// Per-nutrient agreement on a 0..=1 scale.
///
/// Relative difference against the mean, capped so one wildly-off nutrient
/// cannot dominate. Both-zero is perfect agreement; exactly one zero is
/// near-total disagreement rather than a divide-by-zero.
fn nutrient_similarity(expected: f64, actual: f64) -> f64 {
    if expected == 0.0 && actual == 0.0 {
        return 1.0;
    }
    if expected == 0.0 || actual == 0.0 {
        return 0.2;
    }
    let mean = f64::midpoint(expected, actual);
    let relative_diff = ((expected - actual).abs() / mean).min(NUTRIENT_DIFF_CAP);
    (1.0 - relative_diff / NUTRIENT_DIFF_CAP).max(0.0)
}

fn group_share(group: NutrientGroup) -> f64 {
    match group {
        NutrientGroup::Macro => MACRO_WEIGHT_SHARE,
        NutrientGroup::Micro => MICRO_WEIGHT_SHARE,
        NutrientGroup::Remainder => REMAINDER_WEIGHT_SHARE,
    }
}

/// Scores how closely `actual` matches `expected`, 0-100, with a short
/// human-readable summary of the largest disagreements.
///
/// Returns a score of 0 when the profiles share no tracked nutrients.
pub fn profile_similarity(expected: &NutrientProfile, actual: &NutrientProfile) -> (f64, String) {
    let shared: Vec<Nutrient> = Nutrient::ALL
        .into_iter()
        .filter(|n| expected.get(*n).is_some() && actual.get(*n).is_some())
        .collect();

    if shared.is_empty() {
        return (0.0, "no tracked nutrients in common".to_string());
    }

    let mut group_counts = [0usize; 3];
    for nutrient in &shared {
        group_counts[group_index(nutrient.group())] += 1;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut diffs: Vec<(Nutrient, f64, f64, f64)> = Vec::with_capacity(shared.len());

    for nutrient in shared {
        let group = nutrient.group();
        let weight = group_share(group) / group_counts[group_index(group)] as f64;
        let expected_amount = expected.amount(nutrient).unwrap_or(0.0);
        let actual_amount = actual.amount(nutrient).unwrap_or(0.0);
        let similarity = nutrient_similarity(expected_amount, actual_amount);

        weighted_sum += weight * similarity;
        total_weight += weight;
        diffs.push((nutrient, expected_amount, actual_amount, similarity));
    }

    let score = (weighted_sum / total_weight * 100.0).clamp(0.0, 100.0);

    diffs.sort_by(|a, b| a.3.partial_cmp(&b.3).unwrap_or(std::cmp::Ordering::Equal));
    let notable: Vec<String> = diffs
        .iter()
        .take(REASONING_DIFF_LIMIT)
        .filter(|(_, _, _, sim)| *sim < 0.85)
        .map(|(nutrient, expected_amount, actual_amount, _)| {
            format!(
                "{} expected {:.1} vs {:.1}",
                nutrient.key(),
                expected_amount,
                actual_amount
            )
        })
        .collect();

    let reasoning = if notable.is_empty() {
        format!("profiles agree across {} shared nutrients", diffs.len())
    } else {
        format!("largest differences: {}", notable.join(", "))
    };

    (score, reasoning)
}

fn group_index(group: NutrientGroup) -> usize {
    match group {
        NutrientGroup::Macro => 0,
        NutrientGroup::Micro => 1,
        NutrientGroup::Remainder => 2,
    }
}
