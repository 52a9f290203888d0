use thiserror::Error;

/// Errors raised while loading a page schema.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Malformed JSON, a missing key or an unknown `type` tag.
  #[error("failed to parse page config: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("{location}: field path must not be empty")]
  EmptyFieldPath { location: String },

  #[error("{location}: duplicate field '{field}'")]
  DuplicateField { location: String, field: String },

  #[error("{location}: operation group has no operations")]
  EmptyGroup { location: String },

  #[error("{location}: split delimiter must not be empty")]
  EmptyDelimiter { location: String },

  #[error("{location}: invalid pattern '{pattern}': {message}")]
  InvalidPattern {
    location: String,
    pattern: String,
    message: String,
  },
}
