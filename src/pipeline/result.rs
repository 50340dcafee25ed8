//! Terminal result types, one per ingredient per run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::DataType;
use crate::decision::{Flag, MappingStatus};
use crate::nutrition::NutrientProfile;

/// The accepted catalog record with its extracted profile.
#[derive(Debug, Clone, Serialize)]
pub struct ChosenRecord {
    pub fdc_id: u64,
    pub description: String,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_category: Option<String>,
    pub profile: NutrientProfile,
}

/// Terminal outcome for one ingredient. Exactly one per ingredient per run;
/// `flag` is always set, even on failure.
#[derive(Debug, Clone, Serialize)]
pub struct MappingResult {
    pub ingredient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen: Option<ChosenRecord>,
    pub flag: Flag,
    pub mapping_status: MappingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_score: Option<f64>,
    /// Attempts actually run, at most 2. Zero when the budget expired before
    /// the first attempt settled.
    pub attempt_count: u32,
    /// Query used per attempt, in order.
    pub queries: Vec<String>,
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
}

impl MappingResult {
    /// Budget-expiry terminal: never indeterminate, never dropped.
    pub fn timed_out(ingredient: &str, budget_secs: u64) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            chosen: None,
            flag: Flag::NoMappingFound,
            mapping_status: MappingStatus::IngredientTimeout,
            semantic_score: None,
            nutritional_score: None,
            attempt_count: 0,
            queries: Vec::new(),
            reasoning: format!("processing budget of {budget_secs}s exceeded"),
            timestamp: Utc::now(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self.flag, Flag::NoMappingFound)
    }
}
