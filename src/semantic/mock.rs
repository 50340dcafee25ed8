//! Scriptable semantic oracle double with call counting.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::oracle::{SemanticJudgement, SemanticOracle};
use crate::ingredient::Ingredient;
use crate::oracle::OracleError;

#[derive(Default)]
struct MockState {
    /// Keyed by candidate description; unkeyed descriptions fall back to
    /// `default_score` or an error.
    scores: HashMap<String, SemanticJudgement>,
    default_score: Option<f64>,
    calls: u64,
}

/// Mock oracle for tests and the `mock` feature.
#[derive(Default, Clone)]
pub struct MockSemanticOracle {
    state: Arc<RwLock<MockState>>,
}

impl MockSemanticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the score returned for `description`.
    pub fn stub_score(&self, description: &str, score: f64, reasoning: &str) {
        self.state.write().scores.insert(
            description.to_string(),
            SemanticJudgement {
                score,
                reasoning: reasoning.to_string(),
            },
        );
    }

    /// Score returned for any unscripted description (otherwise the mock
    /// errors, modeling an unavailable oracle).
    pub fn default_score(&self, score: f64) {
        self.state.write().default_score = Some(score);
    }

    /// Number of oracle invocations (cache hits never reach here).
    pub fn calls(&self) -> u64 {
        self.state.read().calls
    }
}

#[async_trait]
impl SemanticOracle for MockSemanticOracle {
    async fn score_match(
        &self,
        _ingredient: &Ingredient,
        candidate_description: &str,
    ) -> Result<SemanticJudgement, OracleError> {
        let mut state = self.state.write();
        state.calls += 1;

        if let Some(judgement) = state.scores.get(candidate_description) {
            return Ok(judgement.clone());
        }
        if let Some(score) = state.default_score {
            return Ok(SemanticJudgement {
                score,
                reasoning: "default mock score".to_string(),
            });
        }
        Err(OracleError::CallFailed {
            model: "mock".to_string(),
            message: format!("no scripted score for '{candidate_description}'"),
        })
    }
}
