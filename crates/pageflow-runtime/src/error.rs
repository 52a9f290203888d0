use pageflow_config::ConfigError;
use pageflow_request::RequestError;
use pageflow_value::ValueError;
use thiserror::Error;

/// Errors that can occur while running page sessions.
///
/// User cancellations and failed pre-checks are not errors; they surface as
/// [`OperationOutcome::Aborted`](crate::OperationOutcome::Aborted).
#[derive(Debug, Error)]
pub enum EngineError {
  /// No page with this id.
  #[error("page not found: {page}")]
  PageNotFound { page: String },

  /// The page exists but has no URL for the requested target.
  #[error("no {kind} url configured for page '{page}'")]
  PageUrlMissing { page: String, kind: &'static str },

  /// A page schema failed to parse or validate.
  #[error("invalid page config: {0}")]
  Config(#[from] ConfigError),

  /// An `import_subform` response held no usable field list.
  #[error("invalid fields imported by '{field}': {message}")]
  ImportedFields { field: String, message: String },

  #[error(transparent)]
  Request(#[from] RequestError),

  #[error(transparent)]
  Template(#[from] ValueError),

  /// The engine has no open session.
  #[error("no active session")]
  NoSession,

  /// The addressed step is not mounted or has another type.
  #[error("step {step} is not a mounted {expected} step")]
  StepMismatch { step: usize, expected: &'static str },

  #[error("operation not found: {reference}")]
  OperationNotFound { reference: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}
