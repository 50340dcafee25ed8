//! Chat-model-backed query phrasing.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::ingredient::Ingredient;
use crate::oracle::{ChatOracle, OracleError};
use crate::querygen::{QueryGenerator, deterministic_query};

const SYSTEM_PROMPT: &str = "You phrase food-catalog search queries. Given an \
ingredient, produce ONE search phrase likely to match how a government \
food-composition database words its entries: generic food names, \
comma-inverted forms (\"cheese, cheddar\"), or a broader category term. \
When queries already tried without success are listed, never repeat \
one.\nRespond with ONLY a JSON object: {\"query\": \"<phrase>\"}.";

/// [`QueryGenerator`] backed by a chat model, with a deterministic rewrite
/// as the safety net.
pub struct GenaiQueryGenerator {
    chat: ChatOracle,
}

impl GenaiQueryGenerator {
    pub fn new(chat: ChatOracle) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl QueryGenerator for GenaiQueryGenerator {
    async fn variant(
        &self,
        ingredient: &Ingredient,
        attempt: u32,
        prior: &[String],
    ) -> Result<String, OracleError> {
        let user = format!(
            "Ingredient: {}\nAttempt: {}\nAlready tried: {}",
            ingredient.normalized(),
            attempt,
            if prior.is_empty() {
                "(none)".to_string()
            } else {
                prior.join("; ")
            }
        );

        let query = match self.chat.ask_json(SYSTEM_PROMPT, &user).await {
            Ok(value) => value
                .get("query")
                .and_then(serde_json::Value::as_str)
                .map(|q| q.trim().to_lowercase())
                .unwrap_or_default(),
            Err(err) => {
                warn!(
                    ingredient = %ingredient.normalized(),
                    error = %err,
                    "query oracle failed, using deterministic rewrite"
                );
                String::new()
            }
        };

        let query = if query.is_empty() || prior.iter().any(|p| *p == query) {
            deterministic_query(ingredient, attempt, prior)
        } else {
            query
        };

        debug!(ingredient = %ingredient.normalized(), attempt, %query, "search query generated");
        Ok(query)
    }
}
