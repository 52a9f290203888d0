use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
  /// The configured URL could not be resolved.
  #[error("invalid url '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  /// Transport-level failure; HTTP error statuses are not errors.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// Failure reported by a non-HTTP requester.
  #[error("request to '{url}' failed: {message}")]
  Failed { url: String, message: String },
}
