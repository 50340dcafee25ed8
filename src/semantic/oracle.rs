//! Semantic-matching oracle contract and live implementation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::ingredient::Ingredient;
use crate::oracle::{ChatOracle, OracleError};

/// One oracle answer for an (ingredient, candidate description) pair.
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticJudgement {
    pub score: f64,
    #[serde(default)]
    pub reasoning: String,
}

/// External meaning-equivalence oracle.
#[async_trait]
pub trait SemanticOracle: Send + Sync {
    /// Scores how well `candidate_description` denotes the same food as the
    /// ingredient, 0-100, with short reasoning. Implementations must use
    /// deterministic (zero-variance) settings.
    async fn score_match(
        &self,
        ingredient: &Ingredient,
        candidate_description: &str,
    ) -> Result<SemanticJudgement, OracleError>;
}

const SYSTEM_PROMPT: &str =
    "You are a nutrition database expert. You return only valid JSON objects.";

/// Live oracle over a [`ChatOracle`].
#[derive(Debug, Clone)]
pub struct GenaiSemanticOracle {
    chat: ChatOracle,
}

impl GenaiSemanticOracle {
    pub fn new(chat: ChatOracle) -> Self {
        Self { chat }
    }

    fn prompt(ingredient: &Ingredient, candidate_description: &str) -> String {
        format!(
            r#"Judge whether this catalog food description denotes the same food as the ingredient.

INGREDIENT: "{ingredient}"
CATALOG DESCRIPTION: "{candidate_description}"

Rules:
- Judge semantic meaning, not word overlap: "green lentils" matches "Lentils, green"
  but not "Green onion"; "vanilla bean" never matches "Beans, cannellini".
- Form variations of the same ingredient score high: "cinnamon sticks" vs
  "Spices, cinnamon, ground" is the same ingredient in a different form.
- Survey-style names ("Tzatziki dip", "Guacamole, NFS") are legitimate generic
  foods; do not penalize them.
- Reject different varieties ("jasmine rice" vs "Rice, black") and different
  base ingredients.

Score bands:
- 90-100: exact match or same item with minor naming/form differences
- 80-89: same ingredient, different physical form
- 65-79: related ingredient, acceptable match
- 50-64: related but different
- below 50: different ingredient, reject

Return JSON: {{"score": <0-100>, "reasoning": "<one sentence>"}}"#
        )
    }
}

#[async_trait]
impl SemanticOracle for GenaiSemanticOracle {
    async fn score_match(
        &self,
        ingredient: &Ingredient,
        candidate_description: &str,
    ) -> Result<SemanticJudgement, OracleError> {
        let value = self
            .chat
            .ask_json(SYSTEM_PROMPT, &Self::prompt(ingredient, candidate_description))
            .await?;

        serde_json::from_value(value).map_err(|e| OracleError::InvalidPayload {
            message: e.to_string(),
        })
    }
}
