//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. the merged candidate ceiling)
//! from primary ones to avoid drift.
//!
//! # Threshold Invariants
//!
//! The semantic and nutritional thresholds are treated as invariants across
//! the verifier, the decision tables, and the retry controller. Changing one
//! of them changes which decision row a verdict lands on, so the decision
//! tests pin all of them.

/// Per-tier result caps for the comprehensive four-tier search.
pub const TIER1_RESULT_CAP: usize = 30;
pub const TIER2_RESULT_CAP: usize = 20;
pub const TIER3_RESULT_CAP: usize = 20;
pub const TIER4_RESULT_CAP: usize = 10;

/// Upper bound on the merged, deduplicated candidate list.
pub const MAX_MERGED_CANDIDATES: usize =
    TIER1_RESULT_CAP + TIER2_RESULT_CAP + TIER3_RESULT_CAP + TIER4_RESULT_CAP;

/// Verdicts below this score are dropped before candidate retention.
pub const SEMANTIC_FILTER_FLOOR: f64 = 40.0;

/// Semantic score at or above which a candidate is accepted outright.
pub const SEMANTIC_HIGH_THRESHOLD: f64 = 90.0;

/// Lower bound of the "same substance, different form" semantic band.
pub const SEMANTIC_MID_THRESHOLD: f64 = 80.0;

/// Lower bound of the "related but acceptable" semantic band. Below this the
/// nutritional stage is skipped and the candidate set is rejected.
pub const SEMANTIC_LOW_THRESHOLD: f64 = 65.0;

/// Nutritional similarity required to accept a candidate in the 65-79
/// semantic band.
pub const NUTRITIONAL_HIGH_THRESHOLD: f64 = 90.0;

/// Nutritional similarity required to accept a candidate in the 80-89
/// semantic band.
pub const NUTRITIONAL_MID_THRESHOLD: f64 = 80.0;

/// Nutritional similarity granting a LOW_CONFIDENCE acceptance even when the
/// semantic score fell below [`SEMANTIC_LOW_THRESHOLD`]. Only reachable when
/// the diagnostic nutrition pass is enabled.
pub const NUTRITIONAL_IDENTICAL_THRESHOLD: f64 = 95.0;

/// Candidates retained after semantic filtering.
pub const SEMANTIC_RETAIN_COUNT: usize = 3;

/// Maximum resolution attempts per ingredient.
pub const MAX_ATTEMPTS: u32 = 2;

/// Weight shares for the nutritional similarity composite.
pub const MACRO_WEIGHT_SHARE: f64 = 0.40;
pub const MICRO_WEIGHT_SHARE: f64 = 0.30;
pub const REMAINDER_WEIGHT_SHARE: f64 = 0.30;

/// Relative difference at which two nutrient amounts contribute zero
/// similarity (200% of their mean).
pub const NUTRIENT_DIFF_CAP: f64 = 2.0;

/// Default catalog base URL (USDA FoodData Central).
pub const DEFAULT_FDC_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Default oracle model name.
pub const DEFAULT_ORACLE_MODEL: &str = "gpt-4o-mini";
