use pageflow_config::{DatetimeOptions, FieldConfig, FieldKind};
use pageflow_value::EvaluationContext;
use serde_json::Value;
use tracing::warn;

use crate::display::present;
use crate::error::{FieldError, Validation};
use crate::field::{Field, FieldProps, display_label, required};
use crate::format::{MomentFormat, read_timestamp};

/// `datetime` holds one formatted string; `datetimeRange` a `[start, end]` pair.
#[derive(Debug)]
pub(crate) struct DatetimeField {
  config: FieldConfig,
  format: MomentFormat,
  range: bool,
}

impl DatetimeField {
  pub(crate) fn new(config: FieldConfig) -> Self {
    let (options, range) = match &config.kind {
      FieldKind::Datetime(options) => (options.clone(), false),
      FieldKind::DatetimeRange(options) => (options.clone(), true),
      _ => (DatetimeOptions::default(), false),
    };
    let format = options
      .format
      .as_deref()
      .map(MomentFormat::new)
      .unwrap_or_default();
    Self {
      config,
      format,
      range,
    }
  }

  /// Rewrite timestamps and ISO text into this field's format.
  fn coerce(&self, value: &Value) -> Option<Value> {
    match value {
      Value::String(s) if s.is_empty() => Some(value.clone()),
      Value::String(s) if self.format.parse(s).is_some() => Some(value.clone()),
      other => read_timestamp(other).map(|t| Value::String(self.format.format(&t))),
    }
  }

  fn check_one(&self, label: &str, value: &Value, errors: &mut Vec<FieldError>) {
    let parsed = value.as_str().and_then(|s| self.format.parse(s));
    if parsed.is_none() {
      errors.push(FieldError::new(format!(
        "{label} must match {}",
        self.format.pattern()
      )));
    }
  }
}

impl Field for DatetimeField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn reset(&self, stored: Option<&Value>) -> Option<Value> {
    let value = present(stored)
      .cloned()
      .or_else(|| self.config.default_value.clone())?;
    let coerced = if self.range {
      match &value {
        Value::Array(items) => items
          .iter()
          .map(|item| self.coerce(item))
          .collect::<Option<Vec<_>>>()
          .map(Value::Array),
        _ => None,
      }
    } else {
      self.coerce(&value)
    };
    if coerced.is_none() {
      warn!(field = %self.config.field, value = %value, "datetime_value_dropped");
    }
    coerced
  }

  fn validate(&self, value: Option<&Value>) -> Validation {
    if let Some(error) = required(&self.config, value) {
      return Validation::Invalid(vec![error]);
    }
    let label = display_label(&self.config);
    let Some(value) = present(value) else {
      return Validation::Valid;
    };
    let mut errors = Vec::new();

    if !self.range {
      if value.as_str() != Some("") {
        self.check_one(label, value, &mut errors);
      }
      return Validation::from_errors(errors);
    }

    match value.as_array().map(Vec::as_slice) {
      Some([]) if self.config.required => {
        errors.push(FieldError::new(format!("{label} is required")));
      }
      Some([]) => {}
      Some([start, end]) => {
        self.check_one(label, start, &mut errors);
        self.check_one(label, end, &mut errors);
        let start = start.as_str().and_then(|s| self.format.parse(s));
        let end = end.as_str().and_then(|s| self.format.parse(s));
        if let (Some(start), Some(end)) = (start, end)
          && start > end
        {
          errors.push(FieldError::new(format!(
            "{label} must not end before it starts"
          )));
        }
      }
      _ => errors.push(FieldError::new(format!("{label} must be a start and end"))),
    }
    Validation::from_errors(errors)
  }

  fn props(&self, path: &str, value: Option<&Value>, _ctx: &EvaluationContext<'_>) -> FieldProps {
    FieldProps::new(&self.config, path, value).with_extra("format", self.format.pattern())
  }
}
