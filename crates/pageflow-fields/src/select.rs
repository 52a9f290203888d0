use pageflow_config::{FieldConfig, FieldKind, OptionsConfig, SelectSingleOptions, SingleMode};
use pageflow_value::{EvaluationContext, path, resolve_param};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::display::{display_text, present};
use crate::field::{Field, FieldProps};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
  pub value: Value,
  pub label: String,
}

/// Resolve the options a select field offers in `ctx`.
///
/// Data-sourced options map each list item through `keyField`/`labelField`;
/// primitive items are their own value and label. A source that is not a list
/// yields no options.
pub fn resolve_options(config: &OptionsConfig, ctx: &EvaluationContext<'_>) -> Vec<SelectOption> {
  match config {
    OptionsConfig::Manual { data } => data
      .iter()
      .map(|item| SelectOption {
        value: item.value.clone(),
        label: item.label.clone(),
      })
      .collect(),
    OptionsConfig::Data { source, format } => match resolve_param(source, ctx) {
      Some(Value::Array(items)) => items
        .iter()
        .filter_map(|item| match item {
          Value::Object(_) => {
            let value = path::get(item, &format.key_field)?.clone();
            let label = path::get(item, &format.label_field)
              .map(display_text)
              .unwrap_or_else(|| display_text(&value));
            Some(SelectOption { value, label })
          }
          Value::Null => None,
          other => Some(SelectOption {
            value: other.clone(),
            label: display_text(other),
          }),
        })
        .collect(),
      None | Some(Value::Null) => Vec::new(),
      Some(other) => {
        warn!(value = %other, "options_source_not_a_list");
        Vec::new()
      }
    },
  }
}

/// `select_single` and `radio`.
#[derive(Debug)]
pub(crate) struct SelectSingleField {
  config: FieldConfig,
  options: SelectSingleOptions,
}

impl SelectSingleField {
  pub(crate) fn new(config: FieldConfig) -> Self {
    let options = match &config.kind {
      FieldKind::SelectSingle(options) => options.clone(),
      // A radio field is a single select drawn as radio buttons.
      FieldKind::Radio(options) => SelectSingleOptions {
        mode: SingleMode::Radio,
        ..options.clone()
      },
      _ => SelectSingleOptions::default(),
    };
    Self { config, options }
  }

  fn mode(&self) -> &'static str {
    match self.options.mode {
      SingleMode::Dropdown => "dropdown",
      SingleMode::Radio => "radio",
      SingleMode::Button => "button",
    }
  }
}

impl Field for SelectSingleField {
  fn config(&self) -> &FieldConfig {
    &self.config
  }

  fn normalize(&self, input: Value, ctx: &EvaluationContext<'_>) -> Value {
    if input.is_null() {
      return input;
    }
    let options = resolve_options(&self.options.options, ctx);
    if options.iter().any(|option| option.value == input) {
      input
    } else {
      warn!(field = %self.config.field, value = %input, "select_value_not_in_options");
      Value::Null
    }
  }

  fn props(&self, path: &str, value: Option<&Value>, ctx: &EvaluationContext<'_>) -> FieldProps {
    let options = resolve_options(&self.options.options, ctx);
    let selected = present(value).filter(|value| {
      let known = options.iter().any(|option| option.value == **value);
      if !known {
        warn!(field = %self.config.field, value = %value, "select_value_not_in_options");
      }
      known
    });
    let mut props = FieldProps::new(&self.config, path, selected);
    props.options = options;
    props.mode = Some(self.mode());
    props
  }
}
