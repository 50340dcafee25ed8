//! In-memory mock catalog for tests and the `mock` feature.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::CatalogError;
use super::model::{FoodDetail, SearchHit};
use super::CatalogClient;

#[derive(Default)]
struct MockState {
    /// Keyed by (query, data-type filter). A missing entry returns empty.
    searches: HashMap<(String, Option<String>), Vec<SearchHit>>,
    details: HashMap<u64, FoodDetail>,
    failing_details: HashSet<u64>,
    search_calls: u64,
    detail_calls: u64,
}

/// Scriptable catalog double with call counters.
#[derive(Default, Clone)]
pub struct MockCatalogClient {
    state: Arc<RwLock<MockState>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers search hits for `(query, filter)`.
    pub fn stub_search(&self, query: &str, filter: Option<&str>, hits: Vec<SearchHit>) {
        self.state
            .write()
            .searches
            .insert((query.to_string(), filter.map(str::to_string)), hits);
    }

    /// Registers a detail record.
    pub fn stub_detail(&self, detail: FoodDetail) {
        self.state.write().details.insert(detail.fdc_id, detail);
    }

    /// Makes the detail endpoint fail for `fdc_id`.
    pub fn fail_detail(&self, fdc_id: u64) {
        self.state.write().failing_details.insert(fdc_id);
    }

    pub fn search_calls(&self) -> u64 {
        self.state.read().search_calls
    }

    pub fn detail_calls(&self) -> u64 {
        self.state.read().detail_calls
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn search(
        &self,
        query: &str,
        data_type_filter: Option<&str>,
        page_size: usize,
    ) -> Result<Vec<SearchHit>, CatalogError> {
        let mut state = self.state.write();
        state.search_calls += 1;

        let key = (query.to_string(), data_type_filter.map(str::to_string));
        let mut hits = state.searches.get(&key).cloned().unwrap_or_default();
        hits.truncate(page_size);
        Ok(hits)
    }

    async fn detail(&self, fdc_id: u64) -> Result<FoodDetail, CatalogError> {
        let mut state = self.state.write();
        state.detail_calls += 1;

        if state.failing_details.contains(&fdc_id) {
            return Err(CatalogError::NotFound { fdc_id });
        }
        state
            .details
            .get(&fdc_id)
            .cloned()
            .ok_or(CatalogError::NotFound { fdc_id })
    }
}
