//! Food-composition catalog access (USDA FoodData Central shape).
//!
//! [`CatalogClient`] is the seam the pipeline depends on; [`FdcClient`] is
//! the live HTTP implementation. Transient failures are retried inside the
//! client; callers treat a final error as "this source contributed nothing"
//! rather than a fatal condition.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::FdcClient;
pub use error::CatalogError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCatalogClient;
pub use model::{DataType, FoodDetail, FoodNutrientRow, SearchHit};

use async_trait::async_trait;

/// External catalog contract: category-filtered search plus a detail
/// endpoint exposing the full nutrient table.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Searches the catalog, optionally restricted to a data-type filter
    /// (e.g. `"Foundation,SR Legacy"`), returning at most `page_size` hits
    /// in catalog relevance order.
    async fn search(
        &self,
        query: &str,
        data_type_filter: Option<&str>,
        page_size: usize,
    ) -> Result<Vec<SearchHit>, CatalogError>;

    /// Fetches the full record for a catalog identifier.
    async fn detail(&self, fdc_id: u64) -> Result<FoodDetail, CatalogError>;
}
