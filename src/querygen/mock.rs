//! Scripted query generator for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::ingredient::Ingredient;
use crate::oracle::OracleError;
use crate::querygen::{QueryGenerator, deterministic_query};

/// In-memory [`QueryGenerator`] keyed by `(normalized ingredient, attempt)`.
///
/// Unscripted lookups fall back to the deterministic query (the normalized
/// name on attempt 1, a rewrite on retries) so tests work without scripting
/// every attempt.
#[derive(Clone, Default)]
pub struct MockQueryGenerator {
    variants: Arc<RwLock<HashMap<(String, u32), String>>>,
    calls: Arc<AtomicUsize>,
}

impl MockQueryGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub_variant(&self, ingredient: &str, attempt: u32, query: &str) {
        self.variants
            .write()
            .insert((ingredient.to_lowercase(), attempt), query.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryGenerator for MockQueryGenerator {
    async fn variant(
        &self,
        ingredient: &Ingredient,
        attempt: u32,
        prior: &[String],
    ) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .variants
            .read()
            .get(&(ingredient.normalized().to_string(), attempt))
            .cloned()
            .unwrap_or_else(|| deterministic_query(ingredient, attempt, prior)))
    }
}
