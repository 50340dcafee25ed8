//! Per-100g nutrient profiles and the catalog nutrient-name mapping.
//!
//! A profile maps tracked nutrients to measured amounts; an absent nutrient
//! is unknown, never zero. The tracked set is deliberately small: the
//! similarity composite only weighs nutrients both sides can report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::FoodDetail;

/// kcal per kJ, for catalogs reporting energy in kilojoules.
const KCAL_PER_KJ: f64 = 1.0 / 4.184;

/// Weight groups of the similarity composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientGroup {
    /// Core macronutrients: 40% of the composite.
    Macro,
    /// Key vitamins and minerals: 30%.
    Micro,
    /// Everything else tracked: 30%.
    Remainder,
}

/// Tracked nutrients, identified by their expected-profile key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Calories,
    Protein,
    Carbohydrates,
    TotalFat,
    VitaminA,
    VitaminC,
    VitaminD,
    Calcium,
    Iron,
    Potassium,
    SaturatedFat,
    Fiber,
    Sugars,
    Sodium,
    Cholesterol,
}

impl Nutrient {
    /// Every tracked nutrient.
    pub const ALL: [Nutrient; 15] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbohydrates,
        Nutrient::TotalFat,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Potassium,
        Nutrient::SaturatedFat,
        Nutrient::Fiber,
        Nutrient::Sugars,
        Nutrient::Sodium,
        Nutrient::Cholesterol,
    ];

    /// Snake-case key used in oracle prompts and serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein_g",
            Nutrient::Carbohydrates => "total_carbs_g",
            Nutrient::TotalFat => "total_fat_g",
            Nutrient::VitaminA => "vitamin_a_mcg",
            Nutrient::VitaminC => "vitamin_c_mg",
            Nutrient::VitaminD => "vitamin_d_mcg",
            Nutrient::Calcium => "calcium_mg",
            Nutrient::Iron => "iron_mg",
            Nutrient::Potassium => "potassium_mg",
            Nutrient::SaturatedFat => "saturated_fat_g",
            Nutrient::Fiber => "dietary_fiber_g",
            Nutrient::Sugars => "total_sugars_g",
            Nutrient::Sodium => "sodium_mg",
            Nutrient::Cholesterol => "cholesterol_mg",
        }
    }

    /// Default unit for the nutrient's amounts.
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Protein
            | Nutrient::Carbohydrates
            | Nutrient::TotalFat
            | Nutrient::SaturatedFat
            | Nutrient::Fiber
            | Nutrient::Sugars => "g",
            Nutrient::VitaminC
            | Nutrient::Calcium
            | Nutrient::Iron
            | Nutrient::Potassium
            | Nutrient::Sodium
            | Nutrient::Cholesterol => "mg",
            Nutrient::VitaminA | Nutrient::VitaminD => "mcg",
        }
    }

    /// Weight group in the similarity composite.
    pub fn group(self) -> NutrientGroup {
        match self {
            Nutrient::Calories
            | Nutrient::Protein
            | Nutrient::Carbohydrates
            | Nutrient::TotalFat => NutrientGroup::Macro,
            Nutrient::VitaminA
            | Nutrient::VitaminC
            | Nutrient::VitaminD
            | Nutrient::Calcium
            | Nutrient::Iron
            | Nutrient::Potassium => NutrientGroup::Micro,
            Nutrient::SaturatedFat
            | Nutrient::Fiber
            | Nutrient::Sugars
            | Nutrient::Sodium
            | Nutrient::Cholesterol => NutrientGroup::Remainder,
        }
    }

    /// Maps a catalog nutrient name to a tracked nutrient.
    pub fn from_catalog_name(name: &str) -> Option<Nutrient> {
        match name {
            "Energy" | "Energy (Atwater General Factors)" | "Energy (Atwater Specific Factors)" => {
                Some(Nutrient::Calories)
            }
            "Protein" => Some(Nutrient::Protein),
            "Carbohydrate, by difference" => Some(Nutrient::Carbohydrates),
            "Total lipid (fat)" => Some(Nutrient::TotalFat),
            "Fatty acids, total saturated" => Some(Nutrient::SaturatedFat),
            "Fiber, total dietary" => Some(Nutrient::Fiber),
            "Sugars, total including NLEA" | "Sugars, Total" => Some(Nutrient::Sugars),
            "Sodium, Na" => Some(Nutrient::Sodium),
            "Cholesterol" => Some(Nutrient::Cholesterol),
            "Vitamin A, RAE" => Some(Nutrient::VitaminA),
            "Vitamin C, total ascorbic acid" => Some(Nutrient::VitaminC),
            "Vitamin D (D2 + D3)" => Some(Nutrient::VitaminD),
            "Calcium, Ca" => Some(Nutrient::Calcium),
            "Iron, Fe" => Some(Nutrient::Iron),
            "Potassium, K" => Some(Nutrient::Potassium),
            _ => None,
        }
    }
}

/// One measured amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub amount: f64,
    pub unit: String,
}

/// Per-100g nutrient profile over the tracked set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    nutrients: BTreeMap<Nutrient, Measurement>,
}

impl NutrientProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a measurement; the first write for a nutrient wins.
    pub fn insert(&mut self, nutrient: Nutrient, amount: f64, unit: impl Into<String>) {
        self.nutrients.entry(nutrient).or_insert(Measurement {
            amount,
            unit: unit.into(),
        });
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<&Measurement> {
        self.nutrients.get(&nutrient)
    }

    pub fn amount(&self, nutrient: Nutrient) -> Option<f64> {
        self.nutrients.get(&nutrient).map(|m| m.amount)
    }

    pub fn len(&self) -> usize {
        self.nutrients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nutrients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, &Measurement)> {
        self.nutrients.iter().map(|(n, m)| (*n, m))
    }

    /// Extracts the tracked profile from a catalog detail record,
    /// normalizing energy to kcal.
    pub fn from_detail(detail: &FoodDetail) -> Self {
        let mut profile = Self::new();

        for row in &detail.food_nutrients {
            let Some(name) = row.name() else { continue };
            let Some(nutrient) = Nutrient::from_catalog_name(name) else {
                continue;
            };
            let Some(mut amount) = row.amount else { continue };

            let unit = row.unit().unwrap_or(nutrient.unit());
            if nutrient == Nutrient::Calories && unit.eq_ignore_ascii_case("kj") {
                amount *= KCAL_PER_KJ;
            }
            let unit = if nutrient == Nutrient::Calories {
                "kcal"
            } else {
                unit
            };

            profile.insert(nutrient, amount, unit);
        }

        profile
    }

    /// Builds a profile from an oracle's expected-values JSON object
    /// (`{"calories": 61, "protein_g": null, ...}`); null and missing keys
    /// stay absent.
    pub fn from_expected_json(value: &serde_json::Value) -> Self {
        let mut profile = Self::new();
        let Some(object) = value.as_object() else {
            return profile;
        };

        for nutrient in Nutrient::ALL {
            if let Some(amount) = object.get(nutrient.key()).and_then(serde_json::Value::as_f64)
            {
                profile.insert(nutrient, amount, nutrient.unit());
            }
        }

        profile
    }
}
