//! Shared harness: a resolver wired to scripted collaborators.

use std::sync::Arc;

use nutrimap::cache::RunCache;
use nutrimap::catalog::{FoodDetail, MockCatalogClient, SearchHit};
use nutrimap::config::Config;
use nutrimap::nutrition::{MockNutritionOracle, Nutrient, NutrientProfile};
use nutrimap::pipeline::Resolver;
use nutrimap::querygen::MockQueryGenerator;
use nutrimap::semantic::MockSemanticOracle;

pub type MockResolver =
    Resolver<MockCatalogClient, MockSemanticOracle, MockNutritionOracle, MockQueryGenerator>;

pub struct Harness {
    pub catalog: Arc<MockCatalogClient>,
    pub semantic: Arc<MockSemanticOracle>,
    pub nutrition: Arc<MockNutritionOracle>,
    pub querygen: Arc<MockQueryGenerator>,
    pub cache: RunCache,
    pub resolver: Arc<MockResolver>,
}

pub fn harness() -> Harness {
    harness_with(Config::default())
}

pub fn harness_with(config: Config) -> Harness {
    let catalog = Arc::new(MockCatalogClient::new());
    let semantic = Arc::new(MockSemanticOracle::new());
    let nutrition = Arc::new(MockNutritionOracle::new());
    let querygen = Arc::new(MockQueryGenerator::new());
    let cache = RunCache::new();
    let resolver = Arc::new(Resolver::new(
        Arc::clone(&catalog),
        Arc::clone(&semantic),
        Arc::clone(&nutrition),
        Arc::clone(&querygen),
        cache.clone(),
        &config,
    ));
    Harness {
        catalog,
        semantic,
        nutrition,
        querygen,
        cache,
        resolver,
    }
}

pub fn hit(fdc_id: u64, description: &str, data_type: &str) -> SearchHit {
    serde_json::from_value(serde_json::json!({
        "fdcId": fdc_id,
        "description": description,
        "dataType": data_type,
    }))
    .expect("Search hit fixture should deserialize")
}

pub fn detail(fdc_id: u64, description: &str, kcal: f64, protein: f64) -> FoodDetail {
    serde_json::from_value(serde_json::json!({
        "fdcId": fdc_id,
        "description": description,
        "dataType": "Survey (FNDDS)",
        "foodNutrients": [
            { "nutrient": { "name": "Energy", "unitName": "KCAL" }, "amount": kcal },
            { "nutrient": { "name": "Protein", "unitName": "G" }, "amount": protein },
        ],
    }))
    .expect("Detail fixture should deserialize")
}

pub fn expected_profile(kcal: f64, protein: f64) -> NutrientProfile {
    let mut profile = NutrientProfile::new();
    profile.insert(Nutrient::Calories, kcal, "kcal");
    profile.insert(Nutrient::Protein, protein, "g");
    profile
}
