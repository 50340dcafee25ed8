use std::sync::Arc;

use crate::cache::RunCache;
use crate::catalog::{DataType, FoodDetail, MockCatalogClient};
use crate::ingredient::Ingredient;
use crate::nutrition::{
    MockNutritionOracle, Nutrient, NutrientProfile, NutritionalSimilarityScorer,
    profile_similarity,
};
use crate::search::{CandidateRecord, Tier};
use crate::semantic::{SemanticVerdict, VerifiedCandidate};

fn detail_json(fdc_id: u64, nutrients: &[(&str, f64, &str)]) -> FoodDetail {
    let rows: Vec<serde_json::Value> = nutrients
        .iter()
        .map(|(name, amount, unit)| {
            serde_json::json!({
                "nutrient": { "name": name, "unitName": unit },
                "amount": amount,
            })
        })
        .collect();
    serde_json::from_value(serde_json::json!({
        "fdcId": fdc_id,
        "description": "fixture",
        "dataType": "Survey (FNDDS)",
        "foodNutrients": rows,
    }))
    .unwrap()
}

fn verified(fdc_id: u64) -> VerifiedCandidate {
    VerifiedCandidate {
        candidate: CandidateRecord {
            fdc_id,
            description: "fixture".to_string(),
            data_type: DataType::Survey,
            food_category: None,
            tier: Tier::Survey,
            position: 0,
        },
        relevance: 1000.0,
        verdict: SemanticVerdict {
            ingredient: "fixture".to_string(),
            fdc_id,
            score: 85.0,
            reasoning: String::new(),
        },
    }
}

fn simple_profile(entries: &[(Nutrient, f64)]) -> NutrientProfile {
    let mut profile = NutrientProfile::new();
    for (nutrient, amount) in entries {
        profile.insert(*nutrient, *amount, nutrient.unit());
    }
    profile
}

#[test]
fn detail_extraction_maps_catalog_names() {
    let detail = detail_json(
        1,
        &[
            ("Energy", 61.0, "KCAL"),
            ("Protein", 3.3, "G"),
            ("Sodium, Na", 45.0, "MG"),
            ("Nitrogen", 0.5, "G"),
        ],
    );
    let profile = NutrientProfile::from_detail(&detail);

    assert_eq!(profile.amount(Nutrient::Calories), Some(61.0));
    assert_eq!(profile.amount(Nutrient::Protein), Some(3.3));
    assert_eq!(profile.amount(Nutrient::Sodium), Some(45.0));
    // Untracked names stay out.
    assert_eq!(profile.len(), 3);
}

#[test]
fn detail_extraction_converts_kilojoules() {
    let detail = detail_json(1, &[("Energy", 418.4, "kJ")]);
    let profile = NutrientProfile::from_detail(&detail);

    let kcal = profile.amount(Nutrient::Calories).unwrap();
    assert!((kcal - 100.0).abs() < 0.01);
    assert_eq!(profile.get(Nutrient::Calories).unwrap().unit, "kcal");
}

#[test]
fn first_energy_row_wins() {
    let detail = detail_json(
        1,
        &[
            ("Energy", 61.0, "KCAL"),
            ("Energy (Atwater General Factors)", 63.0, "KCAL"),
        ],
    );
    let profile = NutrientProfile::from_detail(&detail);
    assert_eq!(profile.amount(Nutrient::Calories), Some(61.0));
}

#[test]
fn expected_json_skips_nulls() {
    let value = serde_json::json!({
        "calories": 61,
        "protein_g": 3.3,
        "vitamin_d_mcg": null,
        "unknown_key": 12,
    });
    let profile = NutrientProfile::from_expected_json(&value);

    assert_eq!(profile.amount(Nutrient::Calories), Some(61.0));
    assert_eq!(profile.amount(Nutrient::Protein), Some(3.3));
    assert_eq!(profile.amount(Nutrient::VitaminD), None);
    assert_eq!(profile.len(), 2);
}

#[test]
fn identical_profiles_score_100() {
    let profile = simple_profile(&[
        (Nutrient::Calories, 61.0),
        (Nutrient::Protein, 3.3),
        (Nutrient::Calcium, 110.0),
        (Nutrient::Sodium, 45.0),
    ]);
    let (score, _) = profile_similarity(&profile, &profile);
    assert!((score - 100.0).abs() < 1e-9);
}

#[test]
fn disjoint_profiles_score_zero() {
    let expected = simple_profile(&[(Nutrient::Calories, 61.0)]);
    let actual = simple_profile(&[(Nutrient::Protein, 3.3)]);
    let (score, reasoning) = profile_similarity(&expected, &actual);
    assert_eq!(score, 0.0);
    assert!(reasoning.contains("no tracked nutrients"));
}

#[test]
fn single_shared_nutrient_uses_relative_difference() {
    // mean 75, relative diff 2/3, capped scale 2.0: similarity 2/3.
    let expected = simple_profile(&[(Nutrient::Calories, 100.0)]);
    let actual = simple_profile(&[(Nutrient::Calories, 50.0)]);
    let (score, _) = profile_similarity(&expected, &actual);
    assert!((score - 66.666).abs() < 0.01);
}

#[test]
fn missing_group_weight_renormalizes() {
    // Macros agree perfectly; actual reports no micros or remainder, so the
    // score rests on macros alone instead of penalizing the sparse record.
    let expected = simple_profile(&[
        (Nutrient::Calories, 61.0),
        (Nutrient::Protein, 3.3),
        (Nutrient::Calcium, 110.0),
        (Nutrient::Sodium, 45.0),
    ]);
    let actual = simple_profile(&[(Nutrient::Calories, 61.0), (Nutrient::Protein, 3.3)]);
    let (score, _) = profile_similarity(&expected, &actual);
    assert!((score - 100.0).abs() < 1e-9);
}

#[test]
fn zero_vs_nonzero_is_near_total_disagreement() {
    let expected = simple_profile(&[(Nutrient::Cholesterol, 0.0)]);
    let actual = simple_profile(&[(Nutrient::Cholesterol, 30.0)]);
    let (score, _) = profile_similarity(&expected, &actual);
    assert!((score - 20.0).abs() < 1e-9);
}

#[test]
fn reasoning_names_largest_differences() {
    let expected = simple_profile(&[(Nutrient::Calories, 61.0), (Nutrient::Sugars, 4.0)]);
    let actual = simple_profile(&[(Nutrient::Calories, 61.0), (Nutrient::Sugars, 40.0)]);
    let (_, reasoning) = profile_similarity(&expected, &actual);
    assert!(reasoning.contains("total_sugars_g"), "got: {reasoning}");
}

#[tokio::test]
async fn scorer_orders_by_similarity_and_counts_fetch_failures() {
    let ingredient = Ingredient::new("whole milk");
    let oracle = Arc::new(MockNutritionOracle::new());
    oracle.stub_profile(
        "whole milk",
        simple_profile(&[(Nutrient::Calories, 61.0), (Nutrient::Protein, 3.3)]),
    );

    let catalog = Arc::new(MockCatalogClient::new());
    catalog.stub_detail(detail_json(
        1,
        &[("Energy", 61.0, "KCAL"), ("Protein", 3.3, "G")],
    ));
    catalog.stub_detail(detail_json(
        2,
        &[("Energy", 42.0, "KCAL"), ("Protein", 3.4, "G")],
    ));
    catalog.fail_detail(3);

    let scorer = NutritionalSimilarityScorer::new(oracle, catalog, RunCache::new());
    let report = scorer
        .assess(&ingredient, &[verified(1), verified(2), verified(3)])
        .await
        .unwrap();

    assert_eq!(report.assessments.len(), 2);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.best().unwrap().fdc_id, 1);
    assert!(report.assessments[0].verdict.similarity > report.assessments[1].verdict.similarity);
}

#[tokio::test]
async fn repeated_assessment_reuses_cached_expected_profile() {
    let ingredient = Ingredient::new("whole milk");
    let oracle = Arc::new(MockNutritionOracle::new());
    oracle.stub_profile("whole milk", simple_profile(&[(Nutrient::Calories, 61.0)]));

    let catalog = Arc::new(MockCatalogClient::new());
    catalog.stub_detail(detail_json(1, &[("Energy", 61.0, "KCAL")]));

    let scorer =
        NutritionalSimilarityScorer::new(Arc::clone(&oracle), catalog, RunCache::new());
    scorer.assess(&ingredient, &[verified(1)]).await.unwrap();
    scorer.assess(&ingredient, &[verified(1)]).await.unwrap();

    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn oracle_failure_fails_the_pass_and_nothing_is_cached() {
    let ingredient = Ingredient::new("unscripted");
    let oracle = Arc::new(MockNutritionOracle::new());
    let catalog = Arc::new(MockCatalogClient::new());
    let cache = RunCache::new();

    let scorer = NutritionalSimilarityScorer::new(oracle, catalog, cache.clone());
    let result = scorer.assess(&ingredient, &[verified(1)]).await;
    assert!(result.is_err());
    assert!(cache.peek_profile(&"unscripted".to_string()).await.is_none());
}
