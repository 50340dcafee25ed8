//! Live FoodData Central HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, warn};

use super::error::CatalogError;
use super::model::{FoodDetail, SearchHit, SearchResponse};
use super::CatalogClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);
const MAX_RETRIES: usize = 3;
const RETRY_BASE_BACKOFF: Duration = Duration::from_secs(2);

/// FoodData Central client with bounded retries and exponential backoff.
#[derive(Clone)]
pub struct FdcClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for FdcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdcClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FdcClient {
    /// Creates a client for `base_url` authenticated with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| HttpClient::new());

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_with_retries<T>(
        &self,
        endpoint: String,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, CatalogError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0usize;
        loop {
            attempt += 1;

            let result = self
                .http
                .get(&endpoint)
                .query(&params)
                .query(&[("api_key", self.api_key.as_str())])
                .send()
                .await;

            let retryable_err = match result {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Err(CatalogError::BadStatus { endpoint, status });
                    }
                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        CatalogError::BadStatus {
                            endpoint: endpoint.clone(),
                            status,
                        }
                    } else if !status.is_success() {
                        return Err(CatalogError::BadStatus { endpoint, status });
                    } else {
                        return response.json::<T>().await.map_err(|e| {
                            CatalogError::DecodeFailed {
                                endpoint: endpoint.clone(),
                                source: e,
                            }
                        });
                    }
                }
                Err(e) => CatalogError::RequestFailed {
                    endpoint: endpoint.clone(),
                    source: e,
                },
            };

            if attempt >= MAX_RETRIES {
                return Err(retryable_err);
            }

            let backoff = RETRY_BASE_BACKOFF * 2u32.pow(attempt as u32 - 1);
            warn!(
                endpoint = %endpoint,
                attempt,
                backoff_secs = backoff.as_secs(),
                error = %retryable_err,
                "Catalog request failed, retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

#[async_trait]
impl CatalogClient for FdcClient {
    async fn search(
        &self,
        query: &str,
        data_type_filter: Option<&str>,
        page_size: usize,
    ) -> Result<Vec<SearchHit>, CatalogError> {
        let endpoint = format!("{}/foods/search", self.base_url);

        let mut params = vec![
            ("query", query.to_string()),
            ("pageSize", page_size.min(200).to_string()),
        ];
        if let Some(filter) = data_type_filter {
            params.push(("dataType", filter.to_string()));
        }

        debug!(query, data_type = ?data_type_filter, page_size, "Catalog search");
        let response: SearchResponse = self.get_with_retries(endpoint, params).await?;
        Ok(response.foods)
    }

    async fn detail(&self, fdc_id: u64) -> Result<FoodDetail, CatalogError> {
        let endpoint = format!("{}/food/{}", self.base_url, fdc_id);

        debug!(fdc_id, "Catalog detail fetch");
        match self.get_with_retries::<FoodDetail>(endpoint, Vec::new()).await {
            Ok(detail) => Ok(detail),
            Err(CatalogError::BadStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(CatalogError::NotFound { fdc_id })
            }
            Err(e) => Err(e),
        }
    }
}
