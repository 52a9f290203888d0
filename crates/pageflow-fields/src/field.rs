use std::fmt::Debug;

use pageflow_config::FieldConfig;
use pageflow_value::{EvaluationContext, Segment};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::display::present;
use crate::error::{FieldError, Validation};
use crate::select::SelectOption;

/// Capability interface shared by every field kind.
///
/// Values are addressed relative to the record the field is bound in; the
/// caller reads the value at [`Field::path`] and writes back what `reset` or
/// `normalize` returns.
pub trait Field: Send + Sync + Debug {
  fn config(&self) -> &FieldConfig;

  fn path(&self) -> &str {
    &self.config().field
  }

  /// Value bound at mount. `None` leaves the path unset.
  fn reset(&self, stored: Option<&Value>) -> Option<Value> {
    present(stored)
      .cloned()
      .or_else(|| self.config().default_value.clone())
  }

  fn validate(&self, value: Option<&Value>) -> Validation {
    Validation::from_errors(required(self.config(), value).into_iter().collect())
  }

  /// Value to commit after the user produced `input`.
  fn normalize(&self, input: Value, _ctx: &EvaluationContext<'_>) -> Value {
    input
  }

  /// Like `normalize`, for a change addressed below this field's own path.
  /// `rest` is the remainder of the change path after [`Field::path`].
  fn normalize_at(&self, rest: &[Segment], input: Value, ctx: &EvaluationContext<'_>) -> Value {
    if rest.is_empty() {
      self.normalize(input, ctx)
    } else {
      input
    }
  }

  fn props(&self, path: &str, value: Option<&Value>, _ctx: &EvaluationContext<'_>) -> FieldProps {
    FieldProps::new(self.config(), path, value)
  }

  /// Hidden and blank fields carry data but render nothing.
  fn renders(&self) -> bool {
    true
  }
}

/// The `required` rule: a missing, `null` or empty-string value fails.
pub(crate) fn required(config: &FieldConfig, value: Option<&Value>) -> Option<FieldError> {
  if !config.required {
    return None;
  }
  let empty = match present(value) {
    None => true,
    Some(Value::String(s)) => s.is_empty(),
    Some(_) => false,
  };
  empty.then(|| FieldError::new(format!("{} is required", display_label(config))))
}

pub(crate) fn display_label(config: &FieldConfig) -> &str {
  if config.label.is_empty() {
    &config.field
  } else {
    &config.label
  }
}

/// Everything a view adapter needs to draw one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProps {
  pub kind: &'static str,
  /// Absolute path of the value inside the step's data slice.
  pub path: String,
  pub label: String,
  pub value: Value,
  pub required: bool,
  pub disabled: bool,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<SelectOption>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mode: Option<&'static str>,
  /// Kind-specific presentation settings (placeholder, format, precision, ...).
  #[serde(skip_serializing_if = "Map::is_empty")]
  pub extra: Map<String, Value>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<FieldGroup>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub errors: Vec<FieldError>,
}

impl FieldProps {
  pub fn new(config: &FieldConfig, path: &str, value: Option<&Value>) -> Self {
    Self {
      kind: config.kind.type_name(),
      path: path.to_string(),
      label: config.label.clone(),
      value: value.cloned().unwrap_or(Value::Null),
      required: config.required,
      disabled: config.disabled,
      options: Vec::new(),
      mode: None,
      extra: Map::new(),
      children: Vec::new(),
      errors: Vec::new(),
    }
  }

  pub(crate) fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
    self.extra.insert(key.to_string(), value.into());
    self
  }
}

/// Nested fields of a composite: one group per list row, tab or imported form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGroup {
  pub key: String,
  pub label: String,
  pub fields: Vec<FieldProps>,
}
