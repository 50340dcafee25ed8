use super::*;
use crate::catalog::DataType;
use crate::search::Tier;

fn record(description: &str, data_type: DataType, tier: Tier, position: usize) -> CandidateRecord {
    CandidateRecord {
        fdc_id: position as u64 + 1,
        description: description.to_string(),
        data_type,
        food_category: None,
        tier,
        position,
    }
}

#[test]
fn exact_match_outranks_compound_description() {
    let ingredient = Ingredient::new("tzatziki");
    let exact = record("Tzatziki", DataType::Survey, Tier::Survey, 0);
    let compound = record(
        "Bread, pita, with tzatziki",
        DataType::Survey,
        Tier::Survey,
        1,
    );

    let exact_score = score_candidate(&exact, &ingredient, 0);
    let compound_score = score_candidate(&compound, &ingredient, 1);
    assert!(exact_score > compound_score);
}

#[test]
fn inverted_comma_form_gets_main_word_bonus() {
    let ingredient = Ingredient::new("whole milk");
    let inverted = record("Milk, whole", DataType::Foundation, Tier::Reference, 0);
    let unrelated = record("Cream, heavy", DataType::Foundation, Tier::Reference, 1);

    assert!(
        score_candidate(&inverted, &ingredient, 0) > score_candidate(&unrelated, &ingredient, 1)
    );
}

#[test]
fn processed_form_penalized_unless_requested() {
    let ingredient = Ingredient::new("whole milk");
    let fresh = record("Milk, whole, 3.25%", DataType::Foundation, Tier::Reference, 0);
    let powdered = record("Milk, dry, powdered", DataType::Foundation, Tier::Reference, 0);

    assert!(score_candidate(&fresh, &ingredient, 0) > score_candidate(&powdered, &ingredient, 0));

    // But a query that names the form is not penalized for it.
    let powdered_query = Ingredient::new("powdered milk");
    let for_fresh = score_candidate(&fresh, &powdered_query, 0);
    let for_powdered = score_candidate(&powdered, &powdered_query, 0);
    assert!(for_powdered > for_fresh);
}

#[test]
fn reference_data_type_outranks_branded() {
    let ingredient = Ingredient::new("cinnamon");
    let foundation = record("Spices, cinnamon, ground", DataType::Foundation, Tier::Reference, 0);
    let branded = record(
        "Spices, cinnamon, ground",
        DataType::Branded,
        Tier::Branded,
        0,
    );

    assert!(
        score_candidate(&foundation, &ingredient, 0) > score_candidate(&branded, &ingredient, 0)
    );
}

#[test]
fn category_affinity_nudges_dairy_for_milk_queries() {
    let ingredient = Ingredient::new("milk");
    let mut dairy = record("Milk, whole", DataType::Foundation, Tier::Reference, 0);
    dairy.food_category = Some("Dairy and Egg Products".to_string());
    let plain = record("Milk, whole", DataType::Foundation, Tier::Reference, 0);

    assert!(score_candidate(&dairy, &ingredient, 0) > score_candidate(&plain, &ingredient, 0));
}

#[test]
fn ranking_keeps_merged_order_for_identical_descriptions() {
    let ingredient = Ingredient::new("oregano");
    // Identical descriptions and data types; the merged order (higher tier
    // first) is the only separator and must survive ranking.
    let survey = record("Oregano, dried", DataType::Survey, Tier::Survey, 0);
    let mut catch_all = record("Oregano, dried", DataType::Survey, Tier::CatchAll, 0);
    catch_all.fdc_id = 99;

    let ranked = rank_candidates(vec![survey, catch_all], &ingredient);
    assert_eq!(ranked[0].candidate.tier, Tier::Survey);
    assert!(ranked[0].relevance > ranked[1].relevance);
}

#[test]
fn earlier_merged_position_scores_higher() {
    let ingredient = Ingredient::new("basil");
    let rec = record("Basil, fresh", DataType::Foundation, Tier::Reference, 0);

    let early = score_candidate(&rec, &ingredient, 0);
    let late = score_candidate(&rec, &ingredient, 12);
    assert!(early > late);
    assert!((early - late - 120.0).abs() < f64::EPSILON);
}
