//! Shared LLM oracle plumbing.
//!
//! All three oracle collaborators (semantic match, expected nutrition, query
//! generation) are JSON-in/JSON-out chat calls with deterministic settings.
//! [`ChatOracle`] owns the provider client and the response hygiene; the
//! per-concern traits live next to their consumers.

pub mod error;

pub use error::OracleError;

use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

/// Deterministic chat-completion wrapper around the provider client.
#[derive(Clone)]
pub struct ChatOracle {
    client: Client,
    model: String,
}

impl std::fmt::Debug for ChatOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOracle")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatOracle {
    /// Creates an oracle for `model` using provider credentials from the
    /// environment (the client resolves `OPENAI_API_KEY` etc. itself).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Executes one chat turn at temperature zero and parses the reply as
    /// JSON (tolerating a markdown code fence around it).
    pub async fn ask_json(
        &self,
        system: &str,
        user: &str,
    ) -> Result<serde_json::Value, OracleError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(user),
        ]);
        let options = ChatOptions::default().with_temperature(0.0);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| OracleError::CallFailed {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let text = response
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        debug!(model = %self.model, reply_len = text.len(), "Oracle replied");

        let body = strip_code_fence(text);
        serde_json::from_str(body).map_err(|e| OracleError::InvalidJson {
            message: e.to_string(),
        })
    }
}

/// Strips a surrounding ```/```json fence if the model added one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches('\n')
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
