//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// An integer-valued variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    IntParseError {
        name: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A variable that must be positive was set to zero.
    #[error("{name} must be greater than zero")]
    ZeroValue { name: String },

    /// A variable that must be non-empty was set to an empty string.
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },

    /// The semantic candidate cap exceeds the merged-list ceiling.
    #[error("semantic candidate cap {value} exceeds the merged-list maximum of {max}")]
    CapTooLarge { value: usize, max: usize },
}
