//! Expected-profile oracle.
//!
//! The oracle supplies what a typical 100g of the ingredient should contain;
//! the similarity math against catalog records happens locally.

use async_trait::async_trait;
use tracing::debug;

use crate::ingredient::Ingredient;
use crate::nutrition::profile::{Nutrient, NutrientProfile};
use crate::oracle::{ChatOracle, OracleError};

/// Supplies the expected per-100g nutrient profile for an ingredient.
#[async_trait]
pub trait NutritionOracle: Send + Sync {
    async fn expected_profile(&self, ingredient: &Ingredient)
    -> Result<NutrientProfile, OracleError>;
}

/// Chat-model-backed implementation.
pub struct GenaiNutritionOracle {
    chat: ChatOracle,
}

impl GenaiNutritionOracle {
    pub fn new(chat: ChatOracle) -> Self {
        Self { chat }
    }

    fn system_prompt() -> String {
        let keys: Vec<&str> = Nutrient::ALL.iter().map(|n| n.key()).collect();
        format!(
            "You are a nutrition reference. Given a food ingredient, estimate \
             the typical nutrient content of 100 grams of it in its common raw \
             or as-purchased form.\n\
             Respond with ONLY a JSON object using exactly these keys: {}.\n\
             Values are numbers in the unit the key suffix names (kcal for \
             calories). Use null for any nutrient you cannot estimate \
             reliably. No prose, no markdown.",
            keys.join(", ")
        )
    }
}

#[async_trait]
impl NutritionOracle for GenaiNutritionOracle {
    async fn expected_profile(
        &self,
        ingredient: &Ingredient,
    ) -> Result<NutrientProfile, OracleError> {
        let user = format!("Ingredient: {}", ingredient.normalized());
        let value = self.chat.ask_json(&Self::system_prompt(), &user).await?;

        let profile = NutrientProfile::from_expected_json(&value);
        if profile.is_empty() {
            return Err(OracleError::InvalidPayload {
                message: format!(
                    "expected-profile response for '{}' carried no usable nutrient values",
                    ingredient.normalized()
                ),
            });
        }

        debug!(
            ingredient = %ingredient.normalized(),
            nutrients = profile.len(),
            "expected profile resolved"
        );
        Ok(profile)
    }
}
