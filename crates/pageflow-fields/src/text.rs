use pageflow_config::{FieldConfig, FieldKind, TextOptions};
use pageflow_value::EvaluationContext;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::display::present;
use crate::error::{FieldError, Validation};
use crate::field::{Field, FieldProps, display_label, required};

/// `text` and `longtext`.
#[derive(Debug)]
pub(crate) struct TextField {
  config: FieldConfig,
  options: TextOptions,
  pattern: Option<Regex>,
}

impl TextField {
  pub(crate) fn new(config: FieldConfig) -> Self {
    let options = match &config.kind {
      FieldKind::Text(options) | FieldKind::Longtext(options) => options.clone(),
      _ => TextOptions::default(),
    };
    // Page schemas are checked at load time; imported field lists may not be.
    let pattern = options
      .regexp
      .as_deref()
      .and_then(|pattern| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
          warn!(field = %config.field, pattern, error = %e, "text_pattern_ignored");
          None
        }
      });
    Self {
      config,
      options,
      pattern,
    }
  }

  fn multiline(&self) -> bool {
    matches!(self.config.kind, FieldKind::Longtext(_))
  }
}

impl Field for TextField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn validate(&self, value: Option<&Value>) -> Validation {
    if let Some(error) = required(&self.config, value) {
      return Validation::Invalid(vec![error]);
    }
    let Some(text) = present(value) else {
      return Validation::Valid;
    };
    let Some(text) = text.as_str() else {
      return Validation::Invalid(vec![FieldError::new(format!(
        "{} must be text",
        display_label(&self.config)
      ))]);
    };
    // Length rules and the pattern only apply once something was typed.
    if text.is_empty() {
      return Validation::Valid;
    }

    let label = display_label(&self.config);
    let length = text.chars().count();
    let mut errors = Vec::new();
    if let Some(min) = self.options.min_length
      && length < min
    {
      errors.push(FieldError::new(format!(
        "{label} must be at least {min} characters"
      )));
    }
    if let Some(max) = self.options.max_length
      && length > max
    {
      errors.push(FieldError::new(format!(
        "{label} must be at most {max} characters"
      )));
    }
    if let Some(pattern) = &self.pattern
      && !pattern.is_match(text)
    {
      let message = self
        .options
        .regexp_message
        .clone()
        .unwrap_or_else(|| format!("{label} has an invalid format"));
      errors.push(FieldError::new(message));
    }
    Validation::from_errors(errors)
  }

  fn normalize(&self, input: Value, _ctx: &EvaluationContext<'_>) -> Value {
    match input {
      Value::Null | Value::String(_) => input,
      other => Value::String(crate::display::display_text(&other)),
    }
  }

  fn props(&self, path: &str, value: Option<&Value>, _ctx: &EvaluationContext<'_>) -> FieldProps {
    let mut props = FieldProps::new(&self.config, path, value).with_extra("multiline", self.multiline());
    if let Some(placeholder) = &self.options.placeholder {
      props = props.with_extra("placeholder", placeholder.as_str());
    }
    if let Some(max) = self.options.max_length {
      props = props.with_extra("maxLength", max);
    }
    props
  }
}
