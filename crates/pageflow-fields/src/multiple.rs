use pageflow_config::{FieldConfig, FieldKind, MultipleMode, Multiplicity, SelectMultipleOptions};
use pageflow_value::EvaluationContext;
use serde_json::Value;
use tracing::warn;

use crate::display::{display_text, is_primitive, present};
use crate::field::{Field, FieldProps};
use crate::select::{SelectOption, resolve_options};

/// Read a stored multi-value into its list of selected values.
///
/// Array storage keeps string and number items; split storage breaks a string
/// on the delimiter. Anything else decodes to an empty selection. Every
/// dropped item or value is logged.
pub fn decode(multiple: &Multiplicity, stored: Option<&Value>) -> Vec<Value> {
  let Some(stored) = present(stored) else {
    return Vec::new();
  };
  match (multiple, stored) {
    (Multiplicity::Array, Value::Array(items)) => items
      .iter()
      .filter(|item| {
        let keep = is_primitive(item);
        if !keep {
          warn!(item = %item, "multiple_value_malformed");
        }
        keep
      })
      .cloned()
      .collect(),
    (Multiplicity::Split { .. }, Value::String(s)) if s.is_empty() => Vec::new(),
    (Multiplicity::Split { delimiter }, Value::String(s)) => s
      .split(delimiter.as_str())
      .map(|part| Value::String(part.to_string()))
      .collect(),
    (_, other) => {
      warn!(value = %other, "multiple_value_malformed");
      Vec::new()
    }
  }
}

/// Write a selection back in its storage form.
pub fn encode(multiple: &Multiplicity, values: &[Value]) -> Value {
  match multiple {
    Multiplicity::Array => Value::Array(values.to_vec()),
    Multiplicity::Split { delimiter } => Value::String(
      values
        .iter()
        .map(display_text)
        .collect::<Vec<_>>()
        .join(delimiter),
    ),
  }
}

/// Keep the values present in `options`, in selection order.
///
/// Split storage loses value types, so a decoded string also matches an
/// option whose value prints the same; the option's own value is kept.
fn select_known(multiple: &Multiplicity, values: Vec<Value>, options: &[SelectOption]) -> Vec<Value> {
  values
    .into_iter()
    .filter_map(|value| {
      let found = options.iter().find(|option| {
        option.value == value
          || (matches!(multiple, Multiplicity::Split { .. })
            && value.as_str() == Some(display_text(&option.value).as_str()))
      });
      if found.is_none() {
        warn!(value = %value, "multiple_value_not_in_options");
      }
      found.map(|option| option.value.clone())
    })
    .collect()
}

#[derive(Debug)]
pub(crate) struct SelectMultipleField {
  config: FieldConfig,
  options: SelectMultipleOptions,
}

impl SelectMultipleField {
  pub(crate) fn new(config: FieldConfig) -> Self {
    let options = match &config.kind {
      FieldKind::SelectMultiple(options) => options.clone(),
      _ => SelectMultipleOptions::default(),
    };
    Self { config, options }
  }
}

impl Field for SelectMultipleField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  /// Empty selection when nothing is stored; otherwise the stored value in
  /// this field's storage form.
  fn reset(&self, stored: Option<&Value>) -> Option<Value> {
    let multiple = &self.options.multiple;
    let value = present(stored).or(self.config.default_value.as_ref());
    Some(match (multiple, value) {
      (_, None) => encode(multiple, &[]),
      (Multiplicity::Array, Some(Value::Array(items))) => Value::Array(
        items.iter().filter(|item| is_primitive(item)).cloned().collect(),
      ),
      (Multiplicity::Array, Some(other)) => {
        warn!(field = %self.config.field, value = %other, "multiple_value_malformed");
        Value::Array(Vec::new())
      }
      (Multiplicity::Split { .. }, Some(Value::String(s))) => Value::String(s.clone()),
      (Multiplicity::Split { .. }, Some(Value::Array(items))) => encode(multiple, items),
      (Multiplicity::Split { .. }, Some(other)) => Value::String(display_text(other)),
    })
  }

  /// Accepts either a list of selected values or an already encoded value.
  fn normalize(&self, input: Value, ctx: &EvaluationContext<'_>) -> Value {
    let multiple = &self.options.multiple;
    let values = match input {
      Value::Array(items) => items,
      other => decode(multiple, Some(&other)),
    };
    let options = resolve_options(&self.options.options, ctx);
    encode(multiple, &select_known(multiple, values, &options))
  }

  fn props(&self, path: &str, value: Option<&Value>, ctx: &EvaluationContext<'_>) -> FieldProps {
    let multiple = &self.options.multiple;
    let options = resolve_options(&self.options.options, ctx);
    let selected = Value::Array(select_known(multiple, decode(multiple, value), &options));
    let mut props = FieldProps::new(&self.config, path, Some(&selected));
    props.options = options;
    props.mode = Some(match self.options.mode {
      MultipleMode::Dropdown => "dropdown",
      MultipleMode::Checkbox => "checkbox",
    });
    props
  }
}
