use pageflow_config::{FieldConfig, FieldKind, NumberOptions};
use pageflow_value::EvaluationContext;
use serde_json::{Number, Value};
use tracing::warn;

use crate::display::present;
use crate::error::{FieldError, Validation};
use crate::field::{Field, FieldProps, display_label, required};

#[derive(Debug)]
pub(crate) struct NumberField {
  config: FieldConfig,
  options: NumberOptions,
}

impl NumberField {
  pub(crate) fn new(config: FieldConfig) -> Self {
    let options = match &config.kind {
      FieldKind::Number(options) => options.clone(),
      _ => NumberOptions::default(),
    };
    Self { config, options }
  }
}

/// Round to `precision` digits after the decimal point.
pub(crate) fn round_to(value: f64, precision: u32) -> f64 {
  let factor = 10f64.powi(precision as i32);
  (value * factor).round() / factor
}

/// JSON number for `value`, integral when it has no fraction.
pub(crate) fn to_number(value: f64) -> Value {
  if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
    Value::Number(Number::from(value as i64))
  } else {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
  }
}

impl Field for NumberField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn reset(&self, stored: Option<&Value>) -> Option<Value> {
    let value = present(stored)
      .cloned()
      .or_else(|| self.config.default_value.clone())?;
    match &value {
      Value::Number(_) => Some(value),
      Value::String(s) => match s.trim().parse::<f64>() {
        Ok(n) => Some(to_number(n)),
        Err(_) => {
          warn!(field = %self.config.field, value = %s, "number_value_dropped");
          None
        }
      },
      other => {
        warn!(field = %self.config.field, value = %other, "number_value_dropped");
        None
      }
    }
  }

  fn validate(&self, value: Option<&Value>) -> Validation {
    if let Some(error) = required(&self.config, value) {
      return Validation::Invalid(vec![error]);
    }
    let label = display_label(&self.config);
    let number = match present(value) {
      None => return Validation::Valid,
      Some(Value::String(s)) if s.is_empty() => return Validation::Valid,
      Some(Value::Number(n)) => n.as_f64(),
      Some(_) => None,
    };
    let Some(number) = number else {
      return Validation::Invalid(vec![FieldError::new(format!("{label} must be a number"))]);
    };

    let mut errors = Vec::new();
    if let Some(min) = self.options.min
      && number < min
    {
      errors.push(FieldError::new(format!("{label} must be at least {min}")));
    }
    if let Some(max) = self.options.max
      && number > max
    {
      errors.push(FieldError::new(format!("{label} must be at most {max}")));
    }
    Validation::from_errors(errors)
  }

  /// Numeric text becomes a number rounded to `precision`; text that is not
  /// a number is kept so validation can report it.
  fn normalize(&self, input: Value, _ctx: &EvaluationContext<'_>) -> Value {
    let number = match &input {
      Value::Number(n) => n.as_f64(),
      Value::String(s) if s.trim().is_empty() => return Value::Null,
      Value::String(s) => s.trim().parse::<f64>().ok(),
      _ => None,
    };
    match number {
      Some(n) => to_number(match self.options.precision {
        Some(precision) => round_to(n, precision),
        None => n,
      }),
      None => input,
    }
  }

  fn props(&self, path: &str, value: Option<&Value>, _ctx: &EvaluationContext<'_>) -> FieldProps {
    let mut props = FieldProps::new(&self.config, path, value);
    if let Some(precision) = self.options.precision {
      props = props.with_extra("precision", precision);
    }
    if let Some(min) = self.options.min {
      props = props.with_extra("min", min);
    }
    if let Some(max) = self.options.max {
      props = props.with_extra("max", max);
    }
    props
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn field(value: Value) -> NumberField {
    NumberField::new(serde_json::from_value(value).unwrap())
  }

  fn with_ctx<T>(f: impl FnOnce(&EvaluationContext<'_>) -> T) -> T {
    let data = Vec::new();
    f(&EvaluationContext::new(&Value::Null, &data, 0, &Value::Null))
  }

  #[test]
  fn test_bounds() {
    let age = field(json!({ "field": "age", "label": "Age", "type": "number", "min": 0, "max": 150 }));
    assert!(age.validate(Some(&json!(30))).is_valid());
    assert!(!age.validate(Some(&json!(-1))).is_valid());
    assert_eq!(
      age.validate(Some(&json!(200))).errors()[0].message,
      "Age must be at most 150"
    );
    assert!(!age.validate(Some(&json!("abc"))).is_valid());
  }

  #[test]
  fn test_normalize_parses_and_rounds() {
    let price = field(json!({ "field": "price", "type": "number", "precision": 2 }));
    with_ctx(|ctx| {
      assert_eq!(price.normalize(json!("3.14159"), ctx), json!(3.14));
      assert_eq!(price.normalize(json!("7"), ctx), json!(7));
      assert_eq!(price.normalize(json!(""), ctx), Value::Null);
      assert_eq!(price.normalize(json!("x"), ctx), json!("x"));
    });
  }

  #[test]
  fn test_reset_coerces_numeric_text() {
    let count = field(json!({ "field": "count", "type": "number", "defaultValue": "5" }));
    assert_eq!(count.reset(None), Some(json!(5)));
    assert_eq!(count.reset(Some(&json!({ "nested": true }))), None);
  }
}
