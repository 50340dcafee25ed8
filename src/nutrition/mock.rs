//! Scripted nutrition oracle for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::ingredient::Ingredient;
use crate::nutrition::profile::NutrientProfile;
use crate::nutrition::oracle::NutritionOracle;
use crate::oracle::OracleError;

/// In-memory [`NutritionOracle`] keyed by normalized ingredient name.
///
/// Unscripted ingredients fail with [`OracleError::CallFailed`] so tests
/// notice unexpected lookups instead of silently scoring against nothing.
#[derive(Clone, Default)]
pub struct MockNutritionOracle {
    profiles: Arc<RwLock<HashMap<String, NutrientProfile>>>,
    calls: Arc<AtomicUsize>,
}

impl MockNutritionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the expected profile returned for an ingredient.
    pub fn stub_profile(&self, ingredient: &str, profile: NutrientProfile) {
        self.profiles
            .write()
            .insert(ingredient.to_lowercase(), profile);
    }

    /// Number of `expected_profile` calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionOracle for MockNutritionOracle {
    async fn expected_profile(
        &self,
        ingredient: &Ingredient,
    ) -> Result<NutrientProfile, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .read()
            .get(ingredient.normalized())
            .cloned()
            .ok_or_else(|| OracleError::CallFailed {
                model: "mock".to_string(),
                message: format!("no profile scripted for '{}'", ingredient.normalized()),
            })
    }
}
