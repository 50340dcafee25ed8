//! Oracle error types.
//!
//! An oracle failure is never fatal to an ingredient: the verifier treats it
//! as a missing verdict, and an all-missing attempt feeds the retry trigger.

use thiserror::Error;

/// Errors from an external oracle call or its response handling.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// The provider call itself failed.
    #[error("oracle call failed for model '{model}': {message}")]
    CallFailed { model: String, message: String },

    /// The provider answered with no usable text.
    #[error("oracle returned an empty response")]
    EmptyResponse,

    /// The reply was not valid JSON.
    #[error("oracle reply was not valid JSON: {message}")]
    InvalidJson { message: String },

    /// The reply parsed but did not carry the expected fields.
    #[error("oracle reply missing expected content: {message}")]
    InvalidPayload { message: String },
}
