use serde::Serialize;
use thiserror::Error;

/// A user-correctable problem with a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct FieldError {
  pub message: String,
}

impl FieldError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Outcome of validating one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum Validation {
  #[default]
  Valid,
  /// Errors in the order the rules ran.
  Invalid(Vec<FieldError>),
}

impl Validation {
  pub fn from_errors(errors: Vec<FieldError>) -> Self {
    if errors.is_empty() {
      Self::Valid
    } else {
      Self::Invalid(errors)
    }
  }

  pub fn is_valid(&self) -> bool {
    matches!(self, Self::Valid)
  }

  pub fn errors(&self) -> &[FieldError] {
    match self {
      Self::Valid => &[],
      Self::Invalid(errors) => errors,
    }
  }

  pub fn into_errors(self) -> Vec<FieldError> {
    match self {
      Self::Valid => Vec::new(),
      Self::Invalid(errors) => errors,
    }
  }
}
