//! nutrimap: resolves free-text ingredient names to food-composition
//! catalog records.
//!
//! The chain per ingredient: tiered catalog retrieval, dedup, rule-based
//! relevance ranking, oracle-backed semantic verification, confidence-gated
//! decision, conditional nutritional verification, and a bounded retry with
//! a varied query. Oracle verdicts are cached per run so retries decide
//! identically.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod decision;
pub mod ingredient;
pub mod nutrition;
pub mod oracle;
pub mod pipeline;
pub mod querygen;
pub mod relevance;
pub mod search;
pub mod semantic;

pub use cache::RunCache;
pub use catalog::{CatalogClient, FdcClient};
pub use config::Config;
pub use decision::{Flag, MappingStatus};
pub use ingredient::Ingredient;
pub use pipeline::{MappingResult, Resolver, run_batch};
