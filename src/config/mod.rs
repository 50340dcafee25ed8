//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `NUTRIMAP_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_FDC_BASE_URL, DEFAULT_ORACLE_MODEL, MAX_MERGED_CANDIDATES};

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `NUTRIMAP_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog API key. Required to build a live [`crate::catalog::FdcClient`].
    pub fdc_api_key: Option<String>,

    /// Catalog base URL. Default: the FoodData Central v1 endpoint.
    pub fdc_base_url: String,

    /// Oracle model name. Default: `gpt-4o-mini`.
    pub oracle_model: String,

    /// Per-tier search timeout. Default: `45s`.
    pub tier_timeout: Duration,

    /// Total processing budget per ingredient. Default: `300s`.
    pub ingredient_budget: Duration,

    /// Bounded worker pool width for batch resolution. Default: `4`.
    pub batch_concurrency: usize,

    /// Simultaneous outstanding semantic oracle calls. Default: `4`.
    pub oracle_concurrency: usize,

    /// Max candidates submitted for semantic verification. Default: `80`.
    pub semantic_candidate_cap: usize,

    /// Max entries in the run-scoped verdict cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// Runs the nutritional stage for sub-65 semantic scores so the
    /// `nutritionally_identical_low_semantic` path is reachable.
    /// Default: `false`.
    pub diagnostic_nutrition_pass: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fdc_api_key: None,
            fdc_base_url: DEFAULT_FDC_BASE_URL.to_string(),
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            tier_timeout: Duration::from_secs(45),
            ingredient_budget: Duration::from_secs(300),
            batch_concurrency: 4,
            oracle_concurrency: 4,
            semantic_candidate_cap: MAX_MERGED_CANDIDATES,
            cache_capacity: 10_000,
            diagnostic_nutrition_pass: false,
        }
    }
}

impl Config {
    const ENV_FDC_API_KEY: &'static str = "NUTRIMAP_FDC_API_KEY";
    const ENV_FDC_BASE_URL: &'static str = "NUTRIMAP_FDC_BASE_URL";
    const ENV_ORACLE_MODEL: &'static str = "NUTRIMAP_MODEL";
    const ENV_TIER_TIMEOUT_SECS: &'static str = "NUTRIMAP_TIER_TIMEOUT_SECS";
    const ENV_INGREDIENT_BUDGET_SECS: &'static str = "NUTRIMAP_INGREDIENT_BUDGET_SECS";
    const ENV_BATCH_CONCURRENCY: &'static str = "NUTRIMAP_BATCH_CONCURRENCY";
    const ENV_ORACLE_CONCURRENCY: &'static str = "NUTRIMAP_ORACLE_CONCURRENCY";
    const ENV_SEMANTIC_CANDIDATE_CAP: &'static str = "NUTRIMAP_SEMANTIC_CANDIDATE_CAP";
    const ENV_CACHE_CAPACITY: &'static str = "NUTRIMAP_CACHE_CAPACITY";
    const ENV_DIAGNOSTIC_NUTRITION_PASS: &'static str = "NUTRIMAP_DIAGNOSTIC_NUTRITION_PASS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            fdc_api_key: Self::parse_optional_string_from_env(Self::ENV_FDC_API_KEY),
            fdc_base_url: Self::parse_string_from_env(Self::ENV_FDC_BASE_URL, defaults.fdc_base_url),
            oracle_model: Self::parse_string_from_env(Self::ENV_ORACLE_MODEL, defaults.oracle_model),
            tier_timeout: Self::parse_secs_from_env(
                Self::ENV_TIER_TIMEOUT_SECS,
                defaults.tier_timeout,
            )?,
            ingredient_budget: Self::parse_secs_from_env(
                Self::ENV_INGREDIENT_BUDGET_SECS,
                defaults.ingredient_budget,
            )?,
            batch_concurrency: Self::parse_nonzero_usize_from_env(
                Self::ENV_BATCH_CONCURRENCY,
                defaults.batch_concurrency,
            )?,
            oracle_concurrency: Self::parse_nonzero_usize_from_env(
                Self::ENV_ORACLE_CONCURRENCY,
                defaults.oracle_concurrency,
            )?,
            semantic_candidate_cap: Self::parse_nonzero_usize_from_env(
                Self::ENV_SEMANTIC_CANDIDATE_CAP,
                defaults.semantic_candidate_cap,
            )?,
            cache_capacity: Self::parse_u64_from_env(
                Self::ENV_CACHE_CAPACITY,
                defaults.cache_capacity,
            ),
            diagnostic_nutrition_pass: Self::parse_bool_from_env(
                Self::ENV_DIAGNOSTIC_NUTRITION_PASS,
            ),
        })
    }

    /// Validates invariants that `from_env` cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fdc_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_FDC_BASE_URL,
            });
        }
        if self.oracle_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_ORACLE_MODEL,
            });
        }
        if self.semantic_candidate_cap > MAX_MERGED_CANDIDATES {
            return Err(ConfigError::CapTooLarge {
                value: self.semantic_candidate_cap,
                max: MAX_MERGED_CANDIDATES,
            });
        }
        Ok(())
    }

    /// Returns the configured API key or an error naming the variable.
    pub fn require_fdc_api_key(&self) -> Result<&str, ConfigError> {
        self.fdc_api_key
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_FDC_API_KEY,
            })
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_secs_from_env(var_name: &str, default: Duration) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let secs: u64 = value.parse().map_err(|e| ConfigError::IntParseError {
                    name: var_name.to_string(),
                    value,
                    source: e,
                })?;
                Ok(Duration::from_secs(secs))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_nonzero_usize_from_env(
        var_name: &str,
        default: usize,
    ) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let parsed: usize = value.parse().map_err(|e| ConfigError::IntParseError {
                    name: var_name.to_string(),
                    value: value.clone(),
                    source: e,
                })?;
                if parsed == 0 {
                    return Err(ConfigError::ZeroValue {
                        name: var_name.to_string(),
                    });
                }
                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str) -> bool {
        env::var(var_name)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }
}
