//! Tier definitions and the candidate record flowing through the pipeline.

use serde::Serialize;

use crate::catalog::DataType;
use crate::constants::{
    TIER1_RESULT_CAP, TIER2_RESULT_CAP, TIER3_RESULT_CAP, TIER4_RESULT_CAP,
};

/// Category partitions of the catalog, searched in parallel with their own
/// result caps. Lower priority number wins on deduplication collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tier {
    /// Foundation + SR Legacy: generic reference foods.
    Reference,
    /// Survey (FNDDS): prepared/consumed foods.
    Survey,
    /// Branded commercial products.
    Branded,
    /// Unfiltered catch-all.
    CatchAll,
}

impl Tier {
    /// All tiers in priority order.
    pub const ALL: [Tier; 4] = [Tier::Reference, Tier::Survey, Tier::Branded, Tier::CatchAll];

    /// Collision priority; lower wins.
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            Tier::Reference => 1,
            Tier::Survey => 2,
            Tier::Branded => 3,
            Tier::CatchAll => 4,
        }
    }

    /// Data-type filter passed to the catalog, `None` for the catch-all.
    pub fn data_type_filter(self) -> Option<&'static str> {
        match self {
            Tier::Reference => Some("Foundation,SR Legacy"),
            Tier::Survey => Some("Survey (FNDDS)"),
            Tier::Branded => Some("Branded"),
            Tier::CatchAll => None,
        }
    }

    /// Per-tier result cap.
    pub fn result_cap(self) -> usize {
        match self {
            Tier::Reference => TIER1_RESULT_CAP,
            Tier::Survey => TIER2_RESULT_CAP,
            Tier::Branded => TIER3_RESULT_CAP,
            Tier::CatchAll => TIER4_RESULT_CAP,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A catalog record under consideration for an ingredient, tagged with the
/// tier it came from and its position within that tier's result list.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRecord {
    pub fdc_id: u64,
    pub description: String,
    pub data_type: DataType,
    pub food_category: Option<String>,
    pub tier: Tier,
    pub position: usize,
}
