use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueError {
  /// The template text could not be parsed or rendered.
  #[error("failed to render template '{template}': {message}")]
  Template { template: String, message: String },
}
